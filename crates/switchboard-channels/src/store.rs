//! Message persistence collaborator
//!
//! The receive path only needs two writes: store a new message, and apply a
//! status to a message we sent earlier. Statuses are correlated by the
//! provider id the send returned.

use crate::message::{IncomingMessage, MsgStatus, StatusUpdate};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Store error type
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No message matches the status update's external id
    #[error("message not found: {0}")]
    NotFound(String),

    /// Backend failure
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Persistence for inbound messages and status updates
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a new incoming message, returning its platform id
    async fn write_msg(&self, msg: &IncomingMessage) -> Result<Uuid, StoreError>;

    /// Apply a status update to the outbound message it refers to
    async fn write_status(&self, status: &StatusUpdate) -> Result<(), StoreError>;
}

type ExternalKey = (Uuid, String);

#[derive(Default)]
struct MemoryState {
    incoming: HashMap<ExternalKey, (Uuid, IncomingMessage)>,
    outgoing: HashMap<ExternalKey, MsgStatus>,
}

/// In-process store
///
/// Writing the same incoming message twice (same channel and external id)
/// returns the id assigned the first time.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember an outbound message so later status callbacks can find it
    pub async fn record_sent(&self, channel_uuid: Uuid, external_id: impl Into<String>) {
        self.state
            .write()
            .await
            .outgoing
            .insert((channel_uuid, external_id.into()), MsgStatus::Wired);
    }

    /// Current status of an outbound message
    pub async fn status_of(&self, channel_uuid: Uuid, external_id: &str) -> Option<MsgStatus> {
        self.state
            .read()
            .await
            .outgoing
            .get(&(channel_uuid, external_id.to_string()))
            .copied()
    }

    /// Number of stored incoming messages
    pub async fn message_count(&self) -> usize {
        self.state.read().await.incoming.len()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn write_msg(&self, msg: &IncomingMessage) -> Result<Uuid, StoreError> {
        let key = (msg.channel_uuid, msg.external_id.clone());
        let mut state = self.state.write().await;
        let (id, _) = state
            .incoming
            .entry(key)
            .or_insert_with(|| (Uuid::new_v4(), msg.clone()));
        Ok(*id)
    }

    async fn write_status(&self, status: &StatusUpdate) -> Result<(), StoreError> {
        let key = (status.channel_uuid, status.external_id.clone());
        let mut state = self.state.write().await;
        match state.outgoing.get_mut(&key) {
            Some(current) => {
                *current = status.status;
                Ok(())
            }
            None => Err(StoreError::NotFound(status.external_id.clone())),
        }
    }
}
