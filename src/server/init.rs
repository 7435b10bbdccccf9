//! Server initialization and run loop

use super::config::AppConfig;
use crate::api::{api_router, AppState};
use anyhow::{Context, Result};
use axum::{Extension, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use switchboard_channels::{ChannelRegistry, MemoryStore};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the application router
pub fn build_app(config: Arc<AppConfig>, registry: ChannelRegistry) -> Router {
    let state = Arc::new(AppState {
        config,
        registry,
        store: Arc::new(MemoryStore::new()),
    });

    api_router()
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

/// Run the server until Ctrl+C or SIGTERM
pub async fn run(config: AppConfig) -> Result<()> {
    let registry = ChannelRegistry::with_defaults();

    for channel in &config.channels {
        if registry.get(channel.kind).is_none() {
            warn!(channel = %channel.uuid, kind = %channel.kind, "no handler for channel kind");
            continue;
        }
        info!(
            channel = %channel.uuid,
            kind = %channel.kind,
            "receive route /c/{}/{}/receive",
            channel.kind,
            channel.uuid
        );
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let app = build_app(Arc::new(config), registry);

    info!("HTTP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Switchboard shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}
