//! Outbound dispatcher
//!
//! Drives one canonical outgoing message to the provider: configuration
//! checks, optional media relay, text segmentation, wire sends and
//! response classification. Every step runs strictly in order.

use crate::channel_log::ChannelLog;
use crate::classify::ResponseClassifier;
use crate::config::ChannelConfig;
use crate::error::{Error, OutboundFailure, Result, SendFailure};
use crate::message::{Attachment, MsgStatus, OutgoingMessage};
use crate::relay::MediaRelay;
use crate::transport::{HttpRequest, HttpTransport};
use crate::util::{mask_for_logging, split_message, MAX_MESSAGE_LENGTH};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Coarse attachment category used to pick a wire payload variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    /// `audio/*`
    Audio,
    /// `application/*`
    Document,
    /// `image/*`
    Image,
}

impl MediaCategory {
    /// Classify a MIME type; `None` for categories providers do not accept
    #[must_use]
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        let parsed: mime::Mime = mime_type.trim().parse().ok()?;
        match parsed.type_() {
            mime::AUDIO => Some(Self::Audio),
            mime::APPLICATION => Some(Self::Document),
            mime::IMAGE => Some(Self::Image),
            _ => None,
        }
    }

    /// Whether the provider accepts a caption with this variant
    #[must_use]
    pub fn takes_caption(&self) -> bool {
        matches!(self, Self::Document | Self::Image)
    }
}

/// Endpoints and credential for one send
#[derive(Debug, Clone)]
pub struct SendTarget {
    /// Where wire payloads are posted
    pub send_url: String,
    /// Bearer token
    pub token: String,
}

/// What a channel kind contributes to an outbound send
pub trait WireProtocol: Send + Sync {
    /// Resolve endpoints and credential; fails without touching the network
    fn send_target(&self, channel: &ChannelConfig, msg: &OutgoingMessage) -> Result<SendTarget>;

    /// URL for one wire request. Called once per request, so channels that
    /// need a fresh request id per segment add it here.
    fn request_url(&self, target: &SendTarget) -> String {
        target.send_url.clone()
    }

    /// Payload for one text segment
    fn text_payload(&self, msg: &OutgoingMessage, text: &str) -> Value;

    /// Classifier for send responses
    fn classifier(&self) -> &ResponseClassifier;

    /// Attachment support; `None` for text-only channels
    fn media(&self) -> Option<&dyn MediaWire> {
        None
    }
}

/// What a media-capable channel kind adds to an outbound send
pub trait MediaWire: Send + Sync {
    /// Resolve the upload endpoint; fails without touching the network
    fn upload_url(&self, channel: &ChannelConfig) -> Result<String>;

    /// Payload for an uploaded attachment
    fn media_payload(
        &self,
        msg: &OutgoingMessage,
        category: MediaCategory,
        media_id: &str,
        caption: Option<&str>,
    ) -> Value;
}

/// Result of an outbound send attempt
#[derive(Debug, Clone, Serialize)]
pub struct SendOutcome {
    /// Platform message id
    pub msg_id: Uuid,
    /// `wired` on success, `errored` otherwise
    pub status: MsgStatus,
    /// Provider id of the first wire request that succeeded
    pub external_id: Option<String>,
    /// Why the send ended `errored`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<OutboundFailure>,
    /// Diagnostics for every step attempted
    pub logs: Vec<ChannelLog>,
}

impl SendOutcome {
    fn new(msg_id: Uuid) -> Self {
        Self {
            msg_id,
            status: MsgStatus::Errored,
            external_id: None,
            failure: None,
            logs: Vec::new(),
        }
    }

    fn fail(mut self, failure: impl Into<OutboundFailure>) -> Self {
        self.status = MsgStatus::Errored;
        self.failure = Some(failure.into());
        self
    }

    /// Whether the message was handed to the provider
    #[must_use]
    pub fn is_wired(&self) -> bool {
        self.status == MsgStatus::Wired
    }
}

/// Sends one message for one channel kind
pub struct Dispatcher<'a> {
    protocol: &'a dyn WireProtocol,
    transport: &'a dyn HttpTransport,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher
    #[must_use]
    pub fn new(protocol: &'a dyn WireProtocol, transport: &'a dyn HttpTransport) -> Self {
        Self {
            protocol,
            transport,
        }
    }

    /// Send `msg` on `channel`
    ///
    /// # Errors
    /// Configuration problems and attachment policy violations are returned
    /// as `Err` before any network call. Network-level failures are reported
    /// in the returned outcome with status `errored`.
    #[instrument(skip_all, fields(channel = %channel.uuid, msg_id = %msg.id))]
    pub async fn send(&self, channel: &ChannelConfig, msg: &OutgoingMessage) -> Result<SendOutcome> {
        let target = self.protocol.send_target(channel, msg)?;

        match msg.attachments.as_slice() {
            [] => Ok(self.send_text(&target, msg).await),
            [attachment] => {
                let media = self.protocol.media().ok_or_else(|| {
                    Error::Attachment(format!(
                        "{} channels do not support attachments",
                        channel.kind.display_name()
                    ))
                })?;
                let category = MediaCategory::from_mime(&attachment.mime_type).ok_or_else(|| {
                    Error::Attachment(format!(
                        "unknown attachment mime type: {}",
                        attachment.mime_type
                    ))
                })?;
                let upload_url = media.upload_url(channel)?;
                Ok(self
                    .send_media(&target, media, &upload_url, msg, attachment, category)
                    .await)
            }
            many => Err(Error::Attachment(format!(
                "message has {} attachments, {} allows one",
                many.len(),
                channel.kind.display_name()
            ))),
        }
    }

    async fn send_text(&self, target: &SendTarget, msg: &OutgoingMessage) -> SendOutcome {
        let mut outcome = SendOutcome::new(msg.id);
        let parts = split_message(&msg.text, MAX_MESSAGE_LENGTH);
        let total = parts.len();

        for (i, part) in parts.iter().enumerate() {
            let payload = self.protocol.text_payload(msg, part);
            match self.send_wire(target, &payload, &mut outcome.logs).await {
                Ok(external_id) => {
                    if i == 0 {
                        outcome.external_id = Some(external_id);
                    }
                }
                Err(failure) => {
                    warn!(segment = i + 1, total, error = %failure, "segment send failed, aborting");
                    return outcome.fail(failure);
                }
            }
        }

        info!(
            segments = total,
            text = %mask_for_logging(&msg.text),
            "message wired"
        );
        outcome.status = MsgStatus::Wired;
        outcome
    }

    async fn send_media(
        &self,
        target: &SendTarget,
        media: &dyn MediaWire,
        upload_url: &str,
        msg: &OutgoingMessage,
        attachment: &Attachment,
        category: MediaCategory,
    ) -> SendOutcome {
        let mut outcome = SendOutcome::new(msg.id);

        let media_id = match MediaRelay::new(self.transport)
            .relay(
                &attachment.url,
                &attachment.mime_type,
                upload_url,
                &target.token,
                &mut outcome.logs,
            )
            .await
        {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "media relay failed, message not sent");
                return outcome.fail(e);
            }
        };

        let caption = Some(msg.text.as_str())
            .filter(|t| category.takes_caption() && !t.is_empty());
        let payload = media.media_payload(msg, category, &media_id, caption);

        match self.send_wire(target, &payload, &mut outcome.logs).await {
            Ok(external_id) => {
                info!(?category, "media message wired");
                outcome.external_id = Some(external_id);
                outcome.status = MsgStatus::Wired;
                outcome
            }
            Err(failure) => {
                warn!(error = %failure, "media message send failed");
                outcome.fail(failure)
            }
        }
    }

    async fn send_wire(
        &self,
        target: &SendTarget,
        payload: &Value,
        logs: &mut Vec<ChannelLog>,
    ) -> std::result::Result<String, SendFailure> {
        let request = match HttpRequest::post(self.protocol.request_url(target))
            .bearer(&target.token)
            .json(payload)
        {
            Ok(request) => request,
            Err(e) => {
                logs.push(ChannelLog::from_error("Message Send", &e));
                return Err(SendFailure::Transport(e.to_string()));
            }
        };

        let started = Instant::now();
        let result = self.transport.perform(request.clone()).await;
        let log = ChannelLog::from_exchange("Message Sent", &request, &result, started.elapsed());

        match self.protocol.classifier().classify(&result) {
            Ok(external_id) => {
                logs.push(log);
                Ok(external_id)
            }
            Err(failure) => {
                logs.push(log.with_error(&failure));
                Err(failure)
            }
        }
    }
}
