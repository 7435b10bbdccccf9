use super::types::EventPayload;
use crate::classify::{ResourceNameId, ResponseClassifier};
use crate::config::{ChannelConfig, ConfigKey};
use crate::error::{Error, Result};
use crate::handler::ChannelHandler;
use crate::inbound::decode_json;
use crate::message::{ChannelKind, InboundEvent, IncomingMessage, OutgoingMessage};
use crate::outbound::{Dispatcher, SendOutcome, SendTarget, WireProtocol};
use crate::transport::HttpTransport;
use crate::urn::Urn;
use crate::util::{mask_for_logging, parse_timestamp};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// RBM agent messaging handler
#[derive(Debug)]
pub struct RbmHandler {
    classifier: ResponseClassifier,
}

impl Default for RbmHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl RbmHandler {
    /// Create the handler
    #[must_use]
    pub fn new() -> Self {
        Self {
            classifier: ResponseClassifier::new("/error/status", ResourceNameId::new("/name")),
        }
    }
}

/// `<send_url>/phones/<address>/agentMessages`
pub fn agent_messages_url(send_url: &str, address: &str) -> Result<String> {
    let invalid = |reason: String| Error::Config(format!("invalid send_url set for RBM channel: {reason}"));

    let mut url = url::Url::parse(send_url).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(["phones", address, "agentMessages"]);
    url.set_query(None);

    Ok(url.into())
}

impl WireProtocol for RbmHandler {
    fn send_target(&self, channel: &ChannelConfig, msg: &OutgoingMessage) -> Result<SendTarget> {
        let token = channel.require(ConfigKey::AuthToken)?;
        let send_url = channel.require(ConfigKey::SendUrl)?;

        Ok(SendTarget {
            send_url: agent_messages_url(send_url, msg.urn.path())?,
            token: token.to_string(),
        })
    }

    // messageId must be unique per request, segments included
    fn request_url(&self, target: &SendTarget) -> String {
        format!("{}?messageId={}", target.send_url, Uuid::new_v4())
    }

    fn text_payload(&self, _msg: &OutgoingMessage, text: &str) -> Value {
        json!({ "contentMessage": { "text": text } })
    }

    fn classifier(&self) -> &ResponseClassifier {
        &self.classifier
    }
}

#[async_trait]
impl ChannelHandler for RbmHandler {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Rbm
    }

    #[instrument(skip_all, fields(channel = %channel.uuid))]
    fn normalize(&self, channel: &ChannelConfig, body: &[u8]) -> Result<Vec<InboundEvent>> {
        let payload: EventPayload = decode_json(body)?;
        payload.validate()?;

        let received_on = parse_timestamp(&payload.send_time)?;
        let urn = Urn::rbm(&payload.sender_phone_number)?;

        if payload.text.is_empty() {
            warn!(id = %payload.message_id, "unsupported message type, no text");
        }

        let msg = IncomingMessage::new(
            channel.uuid,
            urn,
            payload.text,
            &payload.message_id,
            received_on,
        );
        debug!(from = %msg.urn, text = %mask_for_logging(&msg.text), "received RBM message");

        Ok(vec![InboundEvent::Message(msg)])
    }

    async fn send(
        &self,
        channel: &ChannelConfig,
        msg: &OutgoingMessage,
        transport: &dyn HttpTransport,
    ) -> Result<SendOutcome> {
        Dispatcher::new(self, transport).send(channel, msg).await
    }
}
