//! Channel handler trait

use crate::config::ChannelConfig;
use crate::error::Result;
use crate::message::{ChannelKind, InboundEvent, OutgoingMessage};
use crate::outbound::SendOutcome;
use crate::transport::{HttpRequest, HttpTransport};
use async_trait::async_trait;

/// One provider kind: inbound normalization plus outbound sending
#[async_trait]
pub trait ChannelHandler: Send + Sync {
    /// Kind this handler serves
    fn kind(&self) -> ChannelKind;

    /// Turn a raw receive body into canonical events
    ///
    /// All-or-nothing: on `Err` no event from this body may be persisted.
    fn normalize(&self, channel: &ChannelConfig, body: &[u8]) -> Result<Vec<InboundEvent>>;

    /// Send a canonical message through the provider
    async fn send(
        &self,
        channel: &ChannelConfig,
        msg: &OutgoingMessage,
        transport: &dyn HttpTransport,
    ) -> Result<SendOutcome>;

    /// Request the host should use to download a deferred media URL
    fn media_download_request(&self, _channel: &ChannelConfig, url: &str) -> Result<HttpRequest> {
        Ok(HttpRequest::get(url))
    }
}
