//! Inbound normalization helpers shared by provider handlers

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use url::Url;

/// Declared content kind of an inbound provider message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    /// Plain text
    Text,
    /// Audio file
    Audio,
    /// Document (caption becomes the body)
    Document,
    /// Image (caption becomes the body)
    Image,
    /// Shared location
    Location,
    /// Video file
    Video,
    /// Voice note
    Voice,
    /// Anything else; kept for diagnostics
    Unsupported(String),
}

impl MessageKind {
    /// Map a provider `type` string
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "text" => Self::Text,
            "audio" => Self::Audio,
            "document" => Self::Document,
            "image" => Self::Image,
            "location" => Self::Location,
            "video" => Self::Video,
            "voice" => Self::Voice,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

/// Decode a request body into a provider payload
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| Error::Parse(e.to_string()))
}

/// Fail validation if a required string field is empty
pub fn require_field(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("field '{name}' is required")));
    }
    Ok(())
}

/// `geo:` URI for a shared location
#[must_use]
pub fn geo_uri(latitude: f64, longitude: f64) -> String {
    format!("geo:{latitude:.6},{longitude:.6}")
}

/// URL the host can fetch a provider media object from later
///
/// `media_path` is resolved against the root of `base`, then the media id
/// is appended as the last path segment.
pub fn deferred_media_url(base: &Url, media_path: &str, media_id: &str) -> Result<String> {
    if media_id.trim().is_empty() {
        return Err(Error::Validation("media id is empty".to_string()));
    }
    let endpoint = base
        .join(media_path)
        .map_err(|e| Error::Config(format!("invalid media path {media_path}: {e}")))?;
    Ok(format!(
        "{}/{}",
        endpoint.as_str().trim_end_matches('/'),
        media_id
    ))
}
