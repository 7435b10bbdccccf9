//! Channel handler registry
//!
//! Built once at start-up and shared by the receive route and the CLI.

use crate::handler::ChannelHandler;
use crate::message::ChannelKind;
use crate::rbm::RbmHandler;
use crate::whatsapp::WhatsAppHandler;
use std::collections::HashMap;
use std::sync::Arc;

/// Handlers keyed by channel kind
#[derive(Default, Clone)]
pub struct ChannelRegistry {
    handlers: HashMap<ChannelKind, Arc<dyn ChannelHandler>>,
}

impl ChannelRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in kind
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(WhatsAppHandler::new()));
        registry.register(Arc::new(RbmHandler::new()));
        registry
    }

    /// Add a handler, replacing any previous one for the same kind
    pub fn register(&mut self, handler: Arc<dyn ChannelHandler>) {
        self.handlers.insert(handler.kind(), handler);
    }

    /// Handler for `kind`
    #[must_use]
    pub fn get(&self, kind: ChannelKind) -> Option<Arc<dyn ChannelHandler>> {
        self.handlers.get(&kind).cloned()
    }

    /// Registered kinds, sorted by tag
    #[must_use]
    pub fn kinds(&self) -> Vec<ChannelKind> {
        let mut kinds: Vec<_> = self.handlers.keys().copied().collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds
    }
}
