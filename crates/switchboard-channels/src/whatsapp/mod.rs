//! WhatsApp Business on-premise API adapter
//!
//! Inbound: the provider posts `messages` and `statuses` batches to the
//! receive route. Media is not downloaded here; each media message gets a
//! deferred URL under `<base_url>/v1/media/<id>` which the host fetches
//! later with [`ChannelHandler::media_download_request`].
//!
//! Outbound: text goes to `<base_url>/v1/messages`, attachments are first
//! relayed to `<base_url>/v1/media` and sent by media id.
//!
//! [`ChannelHandler::media_download_request`]: crate::handler::ChannelHandler::media_download_request

/// Receive and send handler.
pub mod handler;
/// Webhook payload types.
pub mod types;

pub use handler::{status_from_provider, WhatsAppHandler};
pub use types::WebhookPayload;
