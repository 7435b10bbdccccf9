use crate::error::Result;
use crate::inbound::require_field;
use serde::Deserialize;

/// Agent event posted by the RBM platform
///
/// ```json
/// {
///   "senderPhoneNumber": "+12223334444",
///   "messageId": "msg000999888777a",
///   "sendTime": "2018-12-31T15:01:23.045123456Z",
///   "text": "Hello to you too!"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    /// Sender phone number, E.164
    #[serde(default)]
    pub sender_phone_number: String,
    /// Provider message id
    #[serde(default)]
    pub message_id: String,
    /// RFC 3339 send time
    #[serde(default)]
    pub send_time: String,
    /// User text; absent for content we do not carry
    #[serde(default)]
    pub text: String,
}

impl EventPayload {
    /// Check required fields
    pub fn validate(&self) -> Result<()> {
        require_field("senderPhoneNumber", &self.sender_phone_number)?;
        require_field("messageId", &self.message_id)?;
        require_field("sendTime", &self.send_time)
    }
}
