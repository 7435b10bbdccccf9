//! Error types for switchboard-channels

use serde::Serialize;
use thiserror::Error;

/// Channel error type
///
/// These are the hard failures: an inbound request that fails with one of
/// them is rejected as a whole, and an outbound send that fails with one of
/// them never touches the network.
#[derive(Debug, Error)]
pub enum Error {
    /// Request body is not valid JSON for the channel's payload shape
    #[error("unable to parse request JSON: {0}")]
    Parse(String),

    /// A required field is missing or empty
    #[error("validation failed: {0}")]
    Validation(String),

    /// Sender address cannot be turned into a channel identity
    #[error("invalid {scheme} number: {address}")]
    InvalidIdentity {
        /// Identity scheme of the channel (`whatsapp`, `rbm`)
        scheme: &'static str,
        /// Address as received from the provider
        address: String,
    },

    /// Timestamp matches neither RFC 3339 nor epoch seconds
    #[error("invalid timestamp format: {0}")]
    InvalidTimestamp(String),

    /// Channel configuration is missing a required key or holds a bad value
    #[error("configuration error: {0}")]
    Config(String),

    /// Attachment violates the channel's attachment policy
    #[error("attachment error: {0}")]
    Attachment(String),

    /// Persistence collaborator failed
    #[error("store error: {0}")]
    Store(String),

    /// Outgoing request body could not be serialized
    #[error("unable to encode request body: {0}")]
    Encode(String),

    /// Network error outside of a classified send (client construction)
    #[error("network error: {0}")]
    Network(String),
}

impl Error {
    /// HTTP status code the receive endpoint answers with for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Parse(_)
            | Self::Validation(_)
            | Self::InvalidIdentity { .. }
            | Self::InvalidTimestamp(_) => 400,
            Self::Config(_)
            | Self::Attachment(_)
            | Self::Store(_)
            | Self::Encode(_)
            | Self::Network(_) => 500,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by the provider response classifier
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SendFailure {
    /// The HTTP call itself failed (connect, timeout, body read)
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with an error object
    #[error("received error from send endpoint: {0}")]
    ProviderRejected(String),

    /// The response carried no usable message id
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Failure while relaying an attachment to the provider
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum MediaError {
    /// Source bytes could not be retrieved
    #[error("media fetch failed: {0}")]
    #[serde(rename = "media_fetch")]
    Fetch(String),

    /// Provider upload call failed
    #[error("media upload failed: {0}")]
    #[serde(rename = "media_upload")]
    Upload(String),

    /// Upload succeeded but no media id could be read back
    #[error("malformed upload response: {0}")]
    MalformedUpload(String),
}

/// Why an outbound send ended `errored`
///
/// Serializes as the inner failure, e.g.
/// `{"kind": "media_fetch", "detail": "connection refused"}`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(untagged)]
pub enum OutboundFailure {
    /// A wire send was rejected or could not be classified
    #[error(transparent)]
    Send(#[from] SendFailure),

    /// The attachment never reached the provider
    #[error(transparent)]
    Media(#[from] MediaError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_errors_are_bad_requests() {
        assert_eq!(Error::Parse("x".into()).status_code(), 400);
        assert_eq!(Error::InvalidTimestamp("x".into()).status_code(), 400);
        let err = Error::InvalidIdentity {
            scheme: "rbm",
            address: "not a number".into(),
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "invalid rbm number: not a number");
    }

    #[test]
    fn test_store_error_is_server_error() {
        assert_eq!(Error::Store("down".into()).status_code(), 500);
        assert_eq!(Error::Encode("nan".into()).status_code(), 500);
    }

    #[test]
    fn test_outbound_failure_serializes_kind() {
        let fetch = OutboundFailure::from(MediaError::Fetch("connection refused".into()));
        assert_eq!(
            serde_json::to_value(&fetch).unwrap(),
            serde_json::json!({"kind": "media_fetch", "detail": "connection refused"})
        );
        assert_eq!(fetch.to_string(), "media fetch failed: connection refused");

        let rejected = OutboundFailure::from(SendFailure::ProviderRejected("bad".into()));
        assert_eq!(serde_json::to_value(&rejected).unwrap()["kind"], "provider_rejected");
    }
}
