//! Message - Canonical message and event types
//!
//! This module provides the channel-independent representation that the
//! routing platform works with. Provider payloads are normalized into these
//! types on the way in, and outbound sends start from them.

use crate::error::{Error, Result};
use crate::urn::Urn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Channel kind identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    /// WhatsApp Business on-premise API
    #[serde(rename = "wa", alias = "WA")]
    WhatsApp,
    /// Rich Business Messaging
    #[serde(rename = "rbm", alias = "RBM")]
    Rbm,
}

impl ChannelKind {
    /// Get the route tag
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WhatsApp => "wa",
            Self::Rbm => "rbm",
        }
    }

    /// Human readable provider name
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::WhatsApp => "WhatsApp",
            Self::Rbm => "RBM",
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChannelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "wa" | "whatsapp" => Ok(Self::WhatsApp),
            "rbm" => Ok(Self::Rbm),
            other => Err(Error::Config(format!("unknown channel kind: {other}"))),
        }
    }
}

/// Canonical message status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MsgStatus {
    /// Handed to the provider
    Wired,
    /// Provider reports it sent
    Sent,
    /// Provider reports it delivered (or read)
    Delivered,
    /// Provider reports delivery failed
    Failed,
    /// We could not hand it to the provider
    Errored,
}

/// A normalized incoming message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Channel instance the message arrived on
    pub channel_uuid: Uuid,
    /// Sender identity
    pub urn: Urn,
    /// Message text (may be empty)
    pub text: String,
    /// Attachment references (`geo:` URI or deferred media URL)
    pub attachments: Vec<String>,
    /// When the provider says the message was sent
    pub received_on: DateTime<Utc>,
    /// Provider message id
    pub external_id: String,
}

impl IncomingMessage {
    /// Create a new incoming message
    #[must_use]
    pub fn new(
        channel_uuid: Uuid,
        urn: Urn,
        text: impl Into<String>,
        external_id: impl Into<String>,
        received_on: DateTime<Utc>,
    ) -> Self {
        Self {
            channel_uuid,
            urn,
            text: text.into(),
            attachments: Vec::new(),
            received_on,
            external_id: external_id.into(),
        }
    }

    /// Add an attachment reference
    #[must_use]
    pub fn with_attachment(mut self, attachment: impl Into<String>) -> Self {
        self.attachments.push(attachment.into());
        self
    }
}

/// A delivery status update for a previously sent message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Channel instance the callback arrived on
    pub channel_uuid: Uuid,
    /// Provider id of the message being updated
    pub external_id: String,
    /// New status
    pub status: MsgStatus,
}

/// Canonical event produced by inbound normalization
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// New message from a contact
    Message(IncomingMessage),
    /// Status callback for an outbound message
    Status(StatusUpdate),
    /// Entry that was understood but not acted on; acknowledged as info
    Ignored(String),
}

/// Outbound attachment: MIME type plus a location we can fetch it from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// MIME type, e.g. `image/jpeg`
    pub mime_type: String,
    /// Fetchable URL of the content
    pub url: String,
}

impl Attachment {
    /// Create an attachment
    #[must_use]
    pub fn new(mime_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            url: url.into(),
        }
    }
}

impl FromStr for Attachment {
    type Err = Error;

    /// Parse the `mime/type:url` form used by the platform
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((mime_type, url)) if !mime_type.is_empty() && !url.is_empty() => {
                Ok(Self::new(mime_type, url))
            }
            _ => Err(Error::Attachment(format!(
                "expected <mime type>:<url>, got {s:?}"
            ))),
        }
    }
}

impl std::fmt::Display for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.mime_type, self.url)
    }
}

/// A canonical outgoing message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Platform message id
    pub id: Uuid,
    /// Destination identity
    pub urn: Urn,
    /// Text content
    pub text: String,
    /// Attachments (channels accept at most one)
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl OutgoingMessage {
    /// Create a simple text message
    #[must_use]
    pub fn text(urn: Urn, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            urn,
            text: content.into(),
            attachments: Vec::new(),
        }
    }

    /// Add an attachment
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_kind_parse() {
        assert_eq!("wa".parse::<ChannelKind>().unwrap(), ChannelKind::WhatsApp);
        assert_eq!("RBM".parse::<ChannelKind>().unwrap(), ChannelKind::Rbm);
        assert!("telegram".parse::<ChannelKind>().is_err());
        assert_eq!(ChannelKind::Rbm.to_string(), "rbm");
    }

    #[test]
    fn test_attachment_parse() {
        let att: Attachment = "image/jpeg:https://s3.example.com/a.jpg".parse().unwrap();
        assert_eq!(att.mime_type, "image/jpeg");
        assert_eq!(att.url, "https://s3.example.com/a.jpg");
        assert_eq!(att.to_string(), "image/jpeg:https://s3.example.com/a.jpg");

        assert!("no-separator".parse::<Attachment>().is_err());
        assert!(":https://x".parse::<Attachment>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&MsgStatus::Delivered).unwrap();
        assert_eq!(json, "\"delivered\"");
    }
}
