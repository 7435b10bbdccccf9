//! Switchboard Channels - Provider Channel Adapters
//!
//! This crate sits between the message routing platform and external
//! messaging providers:
//! - Inbound: provider webhooks are normalized into canonical messages and
//!   status updates ([`receive()`], [`ChannelHandler::normalize`])
//! - Outbound: canonical messages are segmented, media is relayed, and the
//!   provider response is classified ([`Dispatcher`], [`MediaRelay`],
//!   [`ResponseClassifier`])
//!
//! Supported providers:
//! - WhatsApp Business on-premise API (`wa`)
//! - RBM, Rich Business Messaging (`rbm`)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod channel_log;
pub mod classify;
pub mod config;
pub mod error;
pub mod handler;
pub mod inbound;
pub mod message;
pub mod outbound;
pub mod rbm;
pub mod receive;
pub mod registry;
pub mod relay;
pub mod store;
pub mod transport;
pub mod urn;
pub mod util;
pub mod whatsapp;

#[cfg(test)]
mod test_support;

pub use error::{Error, MediaError, OutboundFailure, Result, SendFailure};

// Re-export canonical types
pub use config::{ChannelConfig, ConfigKey};
pub use message::{
    Attachment, ChannelKind, InboundEvent, IncomingMessage, MsgStatus, OutgoingMessage,
    StatusUpdate,
};
pub use urn::Urn;

// Re-export the four components
pub use classify::{FlatId, IdExtractor, ResourceNameId, ResponseClassifier};
pub use outbound::{Dispatcher, SendOutcome};
pub use receive::{receive, EventAck, ReceiveResponse};
pub use relay::MediaRelay;

// Re-export collaborator seams
pub use channel_log::ChannelLog;
pub use handler::ChannelHandler;
pub use registry::ChannelRegistry;
pub use store::{MemoryStore, MessageStore, StoreError};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};

// Re-export provider handlers
pub use rbm::RbmHandler;
pub use whatsapp::WhatsAppHandler;
