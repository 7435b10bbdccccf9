//! RBM (Rich Business Messaging) agent adapter
//!
//! Inbound events are single text messages keyed by sender phone number.
//! Outbound sends post `contentMessage` payloads to the agent messages
//! resource of the recipient; the provider answers with a resource name
//! whose last segment is the message id. This kind carries text only.

/// Receive and send handler.
pub mod handler;
/// Event payload types.
pub mod types;

pub use handler::{agent_messages_url, RbmHandler};
pub use types::EventPayload;
