//! Receive pipeline: normalize, persist, acknowledge

use crate::config::ChannelConfig;
use crate::error::{Error, Result};
use crate::handler::ChannelHandler;
use crate::message::{InboundEvent, MsgStatus};
use crate::store::{MessageStore, StoreError};
use crate::urn::Urn;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

/// Per-event acknowledgment returned to the provider
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventAck {
    /// A message was stored
    Msg {
        /// Channel the message arrived on
        channel_uuid: Uuid,
        /// Platform id assigned by the store
        msg_uuid: Uuid,
        /// Message text
        text: String,
        /// Sender identity
        urn: Urn,
        /// Attachment references
        attachments: Vec<String>,
        /// Provider message id
        external_id: String,
        /// Provider send time
        received_on: DateTime<Utc>,
    },
    /// A status update was applied
    Status {
        /// Channel the callback arrived on
        channel_uuid: Uuid,
        /// New status
        status: MsgStatus,
        /// Provider id of the updated message
        external_id: String,
    },
    /// Something was accepted but ignored
    Info {
        /// Why
        info: String,
    },
    /// The request failed
    Error {
        /// What went wrong
        error: String,
    },
}

/// Body of a receive response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiveResponse {
    /// `Events Handled` or `Error`
    pub message: &'static str,
    /// One entry per event
    pub data: Vec<EventAck>,
}

impl ReceiveResponse {
    /// Successful handling
    #[must_use]
    pub fn handled(data: Vec<EventAck>) -> Self {
        Self {
            message: "Events Handled",
            data,
        }
    }

    /// Failed request
    #[must_use]
    pub fn error(err: &Error) -> Self {
        Self {
            message: "Error",
            data: vec![EventAck::Error {
                error: err.to_string(),
            }],
        }
    }
}

/// Handle one receive request for `channel`
///
/// The whole body is normalized before anything is written, so a request
/// that fails normalization persists nothing. A status for a message the
/// store does not know is acknowledged as info.
#[instrument(skip_all, fields(channel = %channel.uuid, kind = %handler.kind()))]
pub async fn receive(
    handler: &dyn ChannelHandler,
    channel: &ChannelConfig,
    body: &[u8],
    store: &dyn MessageStore,
) -> Result<Vec<EventAck>> {
    let events = handler.normalize(channel, body)?;
    let mut acks = Vec::with_capacity(events.len());

    for event in events {
        let ack = match event {
            InboundEvent::Message(msg) => {
                let msg_uuid = store
                    .write_msg(&msg)
                    .await
                    .map_err(|e| Error::Store(e.to_string()))?;
                EventAck::Msg {
                    channel_uuid: msg.channel_uuid,
                    msg_uuid,
                    text: msg.text,
                    urn: msg.urn,
                    attachments: msg.attachments,
                    external_id: msg.external_id,
                    received_on: msg.received_on,
                }
            }
            InboundEvent::Status(status) => match store.write_status(&status).await {
                Ok(()) => EventAck::Status {
                    channel_uuid: status.channel_uuid,
                    status: status.status,
                    external_id: status.external_id,
                },
                Err(StoreError::NotFound(_)) => EventAck::Info {
                    info: format!("message id: {} not found, ignored", status.external_id),
                },
                Err(e) => return Err(Error::Store(e.to_string())),
            },
            InboundEvent::Ignored(info) => EventAck::Info { info },
        };
        acks.push(ack);
    }

    info!(events = acks.len(), "events handled");
    Ok(acks)
}
