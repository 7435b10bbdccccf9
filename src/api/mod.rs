//! Web API module for Switchboard
//!
//! Provides endpoints for:
//! - Provider receive callbacks
//! - Health checks

pub mod health;
pub mod receive;

use crate::server::config::AppConfig;
use axum::Router;
use std::sync::Arc;
use switchboard_channels::{ChannelRegistry, MessageStore};

pub use health::health_routes;
pub use receive::receive_routes;

/// Shared state handed to every route through an `Extension`
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: ChannelRegistry,
    pub store: Arc<dyn MessageStore>,
}

/// Create the API router with all endpoints
pub fn api_router() -> Router {
    Router::new().merge(health_routes()).merge(receive_routes())
}
