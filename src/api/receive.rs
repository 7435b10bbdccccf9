//! Provider receive endpoint
//!
//! `POST /c/{kind}/{uuid}/receive` runs the channel's handler over the raw
//! body and answers with one acknowledgment per event.

use super::AppState;
use axum::{
    body::Bytes,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use switchboard_channels::{receive, ChannelKind, ReceiveResponse};
use tracing::{debug, warn};
use uuid::Uuid;

async fn receive_handler(
    Path((kind, uuid)): Path<(String, String)>,
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Response {
    let Ok(kind) = kind.parse::<ChannelKind>() else {
        debug!(kind = %kind, "receive for unknown channel kind");
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(channel) = uuid
        .parse::<Uuid>()
        .ok()
        .and_then(|uuid| state.config.channel(uuid))
        .filter(|channel| channel.kind == kind)
    else {
        debug!(%kind, uuid = %uuid, "receive for unknown channel");
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(handler) = state.registry.get(kind) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match receive(handler.as_ref(), channel, &body, state.store.as_ref()).await {
        Ok(acks) => (StatusCode::OK, Json(ReceiveResponse::handled(acks))).into_response(),
        Err(e) => {
            warn!(channel = %channel.uuid, error = %e, "receive request rejected");
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(ReceiveResponse::error(&e))).into_response()
        }
    }
}

/// Create receive routes
pub fn receive_routes() -> Router {
    Router::new().route("/c/:kind/:uuid/receive", post(receive_handler))
}
