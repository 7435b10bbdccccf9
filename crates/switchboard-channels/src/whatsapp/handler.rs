use super::types::{MediaContent, WebhookMessage, WebhookPayload, WebhookStatus};
use crate::classify::{FlatId, ResponseClassifier};
use crate::config::{ChannelConfig, ConfigKey};
use crate::error::{Error, Result};
use crate::handler::ChannelHandler;
use crate::inbound::{decode_json, deferred_media_url, geo_uri, MessageKind};
use crate::message::{ChannelKind, InboundEvent, IncomingMessage, MsgStatus, OutgoingMessage, StatusUpdate};
use crate::outbound::{Dispatcher, MediaCategory, MediaWire, SendOutcome, SendTarget, WireProtocol};
use crate::transport::{HttpRequest, HttpTransport};
use crate::urn::Urn;
use crate::util::{mask_for_logging, parse_timestamp};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

/// Send endpoint, resolved against the channel base URL
pub const MESSAGES_PATH: &str = "/v1/messages";

/// Media endpoint (upload and download), resolved against the base URL
pub const MEDIA_PATH: &str = "/v1/media";

/// Map a provider status string
#[must_use]
pub fn status_from_provider(raw: &str) -> Option<MsgStatus> {
    match raw {
        "sending" => Some(MsgStatus::Wired),
        "sent" => Some(MsgStatus::Sent),
        "delivered" | "read" => Some(MsgStatus::Delivered),
        "failed" => Some(MsgStatus::Failed),
        _ => None,
    }
}

/// WhatsApp on-premise API handler
#[derive(Debug)]
pub struct WhatsAppHandler {
    classifier: ResponseClassifier,
}

impl Default for WhatsAppHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl WhatsAppHandler {
    /// Create the handler
    #[must_use]
    pub fn new() -> Self {
        Self {
            classifier: ResponseClassifier::new("/errors/0/title", FlatId::new("/messages/0/id")),
        }
    }

    /// Convert one webhook message
    fn normalize_message(&self, channel: &ChannelConfig, msg: &WebhookMessage) -> Result<IncomingMessage> {
        let received_on = parse_timestamp(&msg.timestamp)?;
        let urn = Urn::whatsapp(&msg.from)?;

        let mut text = String::new();
        let mut attachment = None;

        match MessageKind::parse(&msg.message_type) {
            MessageKind::Text => {
                text = msg.text.as_ref().map(|t| t.body.clone()).unwrap_or_default();
            }
            MessageKind::Audio => attachment = self.media_url(channel, msg.audio.as_ref()),
            MessageKind::Document => {
                text = caption(msg.document.as_ref());
                attachment = self.media_url(channel, msg.document.as_ref());
            }
            MessageKind::Image => {
                text = caption(msg.image.as_ref());
                attachment = self.media_url(channel, msg.image.as_ref());
            }
            MessageKind::Location => match &msg.location {
                Some(loc) => attachment = Some(geo_uri(loc.latitude, loc.longitude)),
                None => warn!(id = %msg.id, "location message without coordinates"),
            },
            MessageKind::Video => attachment = self.media_url(channel, msg.video.as_ref()),
            MessageKind::Voice => attachment = self.media_url(channel, msg.voice.as_ref()),
            MessageKind::Unsupported(kind) => {
                warn!(channel = %channel.uuid, id = %msg.id, kind = %kind, "unsupported message type");
            }
        }

        let mut incoming = IncomingMessage::new(channel.uuid, urn, text, &msg.id, received_on);
        if let Some(url) = attachment {
            incoming = incoming.with_attachment(url);
        }
        Ok(incoming)
    }

    /// Deferred download URL for a media object; resolution problems are
    /// logged and the attachment is dropped
    fn media_url(&self, channel: &ChannelConfig, media: Option<&MediaContent>) -> Option<String> {
        let resolved = media
            .ok_or_else(|| Error::Validation("media object missing".to_string()))
            .and_then(|m| {
                channel.require(ConfigKey::AuthToken)?;
                let base = channel.require_url(ConfigKey::BaseUrl)?;
                deferred_media_url(&base, MEDIA_PATH, &m.id)
            });

        match resolved {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(channel = %channel.uuid, error = %e, "unable to resolve media url");
                None
            }
        }
    }

    fn normalize_status(&self, channel: &ChannelConfig, status: &WebhookStatus) -> InboundEvent {
        match status_from_provider(&status.status) {
            Some(value) => InboundEvent::Status(StatusUpdate {
                channel_uuid: channel.uuid,
                external_id: status.id.clone(),
                status: value,
            }),
            None => {
                warn!(channel = %channel.uuid, id = %status.id, status = %status.status, "invalid status, skipping");
                InboundEvent::Ignored(format!("invalid status: {}", status.status))
            }
        }
    }
}

fn caption(media: Option<&MediaContent>) -> String {
    media.and_then(|m| m.caption.clone()).unwrap_or_default()
}

fn endpoint(channel: &ChannelConfig, path: &str) -> Result<String> {
    channel
        .require_url(ConfigKey::BaseUrl)?
        .join(path)
        .map(String::from)
        .map_err(|e| Error::Config(format!("invalid base_url set for WhatsApp channel: {e}")))
}

impl WireProtocol for WhatsAppHandler {
    fn send_target(&self, channel: &ChannelConfig, _msg: &OutgoingMessage) -> Result<SendTarget> {
        let token = channel.require(ConfigKey::AuthToken)?;

        Ok(SendTarget {
            send_url: endpoint(channel, MESSAGES_PATH)?,
            token: token.to_string(),
        })
    }

    fn text_payload(&self, msg: &OutgoingMessage, text: &str) -> Value {
        json!({
            "to": msg.urn.path(),
            "type": "text",
            "text": { "body": text },
        })
    }

    fn classifier(&self) -> &ResponseClassifier {
        &self.classifier
    }

    fn media(&self) -> Option<&dyn MediaWire> {
        Some(self)
    }
}

impl MediaWire for WhatsAppHandler {
    fn upload_url(&self, channel: &ChannelConfig) -> Result<String> {
        endpoint(channel, MEDIA_PATH)
    }

    fn media_payload(
        &self,
        msg: &OutgoingMessage,
        category: MediaCategory,
        media_id: &str,
        caption: Option<&str>,
    ) -> Value {
        let (kind, mut content) = match category {
            MediaCategory::Audio => ("audio", json!({ "id": media_id })),
            MediaCategory::Document => ("document", json!({ "id": media_id })),
            MediaCategory::Image => ("image", json!({ "id": media_id })),
        };
        if let (Some(caption), Some(obj)) = (caption, content.as_object_mut()) {
            obj.insert("caption".to_string(), Value::from(caption));
        }

        let mut payload = json!({ "to": msg.urn.path(), "type": kind });
        payload[kind] = content;
        payload
    }
}

#[async_trait]
impl ChannelHandler for WhatsAppHandler {
    fn kind(&self) -> ChannelKind {
        ChannelKind::WhatsApp
    }

    #[instrument(skip_all, fields(channel = %channel.uuid))]
    fn normalize(&self, channel: &ChannelConfig, body: &[u8]) -> Result<Vec<InboundEvent>> {
        let payload: WebhookPayload = decode_json(body)?;
        payload.validate()?;

        let mut events = Vec::with_capacity(payload.messages.len() + payload.statuses.len());

        for msg in &payload.messages {
            let incoming = self.normalize_message(channel, msg)?;
            debug!(
                from = %incoming.urn,
                text = %mask_for_logging(&incoming.text),
                "received WhatsApp message"
            );
            events.push(InboundEvent::Message(incoming));
        }

        events.extend(
            payload
                .statuses
                .iter()
                .map(|status| self.normalize_status(channel, status)),
        );

        Ok(events)
    }

    async fn send(
        &self,
        channel: &ChannelConfig,
        msg: &OutgoingMessage,
        transport: &dyn HttpTransport,
    ) -> Result<SendOutcome> {
        Dispatcher::new(self, transport).send(channel, msg).await
    }

    fn media_download_request(&self, channel: &ChannelConfig, url: &str) -> Result<HttpRequest> {
        let token = channel.require(ConfigKey::AuthToken)?;
        Ok(HttpRequest::get(url).bearer(token))
    }
}
