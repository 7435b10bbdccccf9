//! Channel instance configuration
//!
//! The host owns channel configuration; handlers only read it. A missing
//! key is always an error, never silently defaulted.

use crate::error::{Error, Result};
use crate::message::ChannelKind;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use url::Url;
use uuid::Uuid;

/// Keys a handler may look up on a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// Bearer token for the provider API
    AuthToken,
    /// Endpoint messages are posted to
    SendUrl,
    /// Root of the provider API
    BaseUrl,
}

impl ConfigKey {
    /// Key name as it appears in configuration files
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthToken => "auth_token",
            Self::SendUrl => "send_url",
            Self::BaseUrl => "base_url",
        }
    }
}

/// One configured provider channel
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Channel instance id (appears in the receive route)
    pub uuid: Uuid,
    /// Provider kind
    pub kind: ChannelKind,
    /// The channel's own address (phone number)
    #[serde(default)]
    pub address: String,
    /// Provider API token
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub auth_token: Option<SecretString>,
    /// Send endpoint (RBM)
    #[serde(default)]
    pub send_url: Option<String>,
    /// API root (WhatsApp)
    #[serde(default)]
    pub base_url: Option<String>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(SecretString::from))
}

impl ChannelConfig {
    /// Create a channel with no credentials
    #[must_use]
    pub fn new(uuid: Uuid, kind: ChannelKind, address: impl Into<String>) -> Self {
        Self {
            uuid,
            kind,
            address: address.into(),
            auth_token: None,
            send_url: None,
            base_url: None,
        }
    }

    /// Set the auth token
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(SecretString::from(token.into()));
        self
    }

    /// Set the send URL
    #[must_use]
    pub fn with_send_url(mut self, url: impl Into<String>) -> Self {
        self.send_url = Some(url.into());
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Look up a key; empty values count as absent
    #[must_use]
    pub fn config_for_key(&self, key: ConfigKey) -> Option<&str> {
        let value = match key {
            ConfigKey::AuthToken => self.auth_token.as_ref().map(|t| t.expose_secret()),
            ConfigKey::SendUrl => self.send_url.as_deref(),
            ConfigKey::BaseUrl => self.base_url.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Look up a key that must be present
    pub fn require(&self, key: ConfigKey) -> Result<&str> {
        self.config_for_key(key).ok_or_else(|| {
            Error::Config(format!(
                "missing {} for {} channel",
                key.as_str(),
                self.kind.display_name()
            ))
        })
    }

    /// Look up a URL key that must be present and parse as an absolute URL
    pub fn require_url(&self, key: ConfigKey) -> Result<Url> {
        let raw = self.require(key)?;
        Url::parse(raw).map_err(|e| {
            Error::Config(format!(
                "invalid {} set for {} channel: {e}",
                key.as_str(),
                self.kind.display_name()
            ))
        })
    }
}
