use crate::error::Result;
use crate::inbound::require_field;
use serde::Deserialize;

/// Receive webhook body
///
/// ```json
/// {
///   "statuses": [{ "id": "9712A34B4A8B6AD50F", "recipient_id": "16315555555",
///                  "status": "sent", "timestamp": "1518694700" }],
///   "messages": [{ "from": "16315555555", "id": "3AF99CB6BE490DCAF641",
///                  "timestamp": "1518694235", "type": "text",
///                  "text": { "body": "Hello this is an answer" } }]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    /// Messages from contacts
    #[serde(default)]
    pub messages: Vec<WebhookMessage>,
    /// Delivery receipts
    #[serde(default)]
    pub statuses: Vec<WebhookStatus>,
}

impl WebhookPayload {
    /// Check required fields of every entry
    pub fn validate(&self) -> Result<()> {
        for msg in &self.messages {
            require_field("from", &msg.from)?;
            require_field("id", &msg.id)?;
            require_field("timestamp", &msg.timestamp)?;
            require_field("type", &msg.message_type)?;
        }
        for status in &self.statuses {
            require_field("id", &status.id)?;
            require_field("recipient_id", &status.recipient_id)?;
            require_field("timestamp", &status.timestamp)?;
            require_field("status", &status.status)?;
        }
        Ok(())
    }
}

/// Webhook message
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookMessage {
    /// Sender phone number
    pub from: String,
    /// Message ID
    pub id: String,
    /// Epoch seconds
    pub timestamp: String,
    /// Message type
    #[serde(rename = "type")]
    pub message_type: String,
    /// Text content
    pub text: Option<TextContent>,
    /// Audio content
    pub audio: Option<MediaContent>,
    /// Document content
    pub document: Option<MediaContent>,
    /// Image content
    pub image: Option<MediaContent>,
    /// Location content
    pub location: Option<LocationContent>,
    /// Video content
    pub video: Option<MediaContent>,
    /// Voice content
    pub voice: Option<MediaContent>,
}

/// Text content in message
#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    /// Message body
    #[serde(default)]
    pub body: String,
}

/// Media object reference
#[derive(Debug, Clone, Deserialize)]
pub struct MediaContent {
    /// Provider media id
    #[serde(default)]
    pub id: String,
    /// MIME type
    pub mime_type: Option<String>,
    /// Caption (documents and images)
    pub caption: Option<String>,
}

/// Shared location
#[derive(Debug, Clone, Deserialize)]
pub struct LocationContent {
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
    /// Place name
    pub name: Option<String>,
    /// Street address
    pub address: Option<String>,
}

/// Webhook status (delivery receipts)
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookStatus {
    /// Message ID
    pub id: String,
    /// Recipient ID
    pub recipient_id: String,
    /// Epoch seconds
    pub timestamp: String,
    /// Status (sending, sent, delivered, read, failed)
    pub status: String,
}
