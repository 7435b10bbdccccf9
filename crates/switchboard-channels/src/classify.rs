//! Provider response classification
//!
//! Turns the result of a send call into either the provider's message id or
//! a [`SendFailure`]. The order of checks matters: a transport failure wins
//! over anything in the body, and an error object wins over an id.

use crate::error::SendFailure;
use crate::transport::{HttpResponse, TransportError};
use serde_json::Value;

/// Strategy for pulling a message id out of a provider response
pub trait IdExtractor: Send + Sync {
    /// Extract the id, or `None` if the body does not carry a usable one
    fn extract(&self, body: &Value) -> Option<String>;
}

/// The id sits directly at a JSON pointer, e.g. `/messages/0/id`
#[derive(Debug, Clone, Copy)]
pub struct FlatId {
    pointer: &'static str,
}

impl FlatId {
    /// Read the id at `pointer`
    #[must_use]
    pub const fn new(pointer: &'static str) -> Self {
        Self { pointer }
    }
}

impl IdExtractor for FlatId {
    fn extract(&self, body: &Value) -> Option<String> {
        body.pointer(self.pointer)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }
}

/// The id is the last segment of a resource name,
/// e.g. `phones/+1555/agentMessages/ABC123` at `/name`
#[derive(Debug, Clone, Copy)]
pub struct ResourceNameId {
    pointer: &'static str,
}

impl ResourceNameId {
    /// Read the resource name at `pointer`
    #[must_use]
    pub const fn new(pointer: &'static str) -> Self {
        Self { pointer }
    }
}

impl IdExtractor for ResourceNameId {
    fn extract(&self, body: &Value) -> Option<String> {
        let name = body.pointer(self.pointer).and_then(Value::as_str)?;
        name.rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }
}

/// Classifies send responses for one channel kind
pub struct ResponseClassifier {
    error_pointer: &'static str,
    extractor: Box<dyn IdExtractor>,
}

impl std::fmt::Debug for ResponseClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseClassifier")
            .field("error_pointer", &self.error_pointer)
            .finish_non_exhaustive()
    }
}

impl ResponseClassifier {
    /// Create a classifier that probes `error_pointer` for a provider error
    /// and uses `extractor` for the id
    #[must_use]
    pub fn new(error_pointer: &'static str, extractor: impl IdExtractor + 'static) -> Self {
        Self {
            error_pointer,
            extractor: Box::new(extractor),
        }
    }

    /// Provider error text, if the body carries a non-empty one
    #[must_use]
    pub fn provider_error(&self, body: &Value) -> Option<String> {
        body.pointer(self.error_pointer)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_string)
    }

    /// Classify the outcome of one send call
    pub fn classify(
        &self,
        result: &Result<HttpResponse, TransportError>,
    ) -> Result<String, SendFailure> {
        let response = result
            .as_ref()
            .map_err(|e| SendFailure::Transport(e.to_string()))?;

        let Some(body) = response.json() else {
            return Err(SendFailure::MalformedResponse(format!(
                "response body is not JSON (status {})",
                response.status
            )));
        };

        if let Some(title) = self.provider_error(&body) {
            return Err(SendFailure::ProviderRejected(title));
        }

        self.extractor.extract(&body).ok_or_else(|| {
            SendFailure::MalformedResponse(format!(
                "unable to get message id from response body (status {})",
                response.status
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rbm() -> ResponseClassifier {
        ResponseClassifier::new("/error/status", ResourceNameId::new("/name"))
    }

    fn whatsapp() -> ResponseClassifier {
        ResponseClassifier::new("/errors/0/title", FlatId::new("/messages/0/id"))
    }

    fn ok(status: u16, body: &str) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse::new(status, body))
    }

    #[test]
    fn test_resource_name_last_segment() {
        let result = ok(201, r#"{"name": "phones/X/agentMessages/ABC123"}"#);
        assert_eq!(rbm().classify(&result), Ok("ABC123".to_string()));
    }

    #[test]
    fn test_resource_name_empty_segment_is_malformed() {
        for body in [r#"{"name": "/"}"#, r#"{"name": "phones/X/"}"#, r#"{"name": ""}"#] {
            assert!(matches!(
                rbm().classify(&ok(200, body)),
                Err(SendFailure::MalformedResponse(_))
            ));
        }
    }

    #[test]
    fn test_resource_name_without_slash() {
        assert_eq!(rbm().classify(&ok(200, r#"{"name": "ABC"}"#)), Ok("ABC".to_string()));
    }

    #[test]
    fn test_flat_id() {
        let result = ok(201, r#"{"messages": [{"id": "157b5e14568e8"}]}"#);
        assert_eq!(whatsapp().classify(&result), Ok("157b5e14568e8".to_string()));
    }

    #[test]
    fn test_provider_error_regardless_of_status() {
        let body = r#"{ "error": { "status": "PERMISSION_DENIED" } }"#;
        for status in [200, 403] {
            assert_eq!(
                rbm().classify(&ok(status, body)),
                Err(SendFailure::ProviderRejected("PERMISSION_DENIED".into()))
            );
        }

        let body = r#"{"errors": [{"title": "Recipient not on WhatsApp"}], "messages": [{"id": "x"}]}"#;
        assert_eq!(
            whatsapp().classify(&ok(200, body)),
            Err(SendFailure::ProviderRejected("Recipient not on WhatsApp".into()))
        );
    }

    #[test]
    fn test_empty_error_field_is_ignored() {
        let body = r#"{"error": {"status": ""}, "name": "phones/X/agentMessages/ID9"}"#;
        assert_eq!(rbm().classify(&ok(200, body)), Ok("ID9".to_string()));
    }

    #[test]
    fn test_transport_error_wins() {
        let result = Err(TransportError("timed out".into()));
        assert_eq!(
            rbm().classify(&result),
            Err(SendFailure::Transport("timed out".into()))
        );
    }

    #[test]
    fn test_missing_id_is_malformed() {
        assert!(matches!(
            whatsapp().classify(&ok(200, r#"{"messages": []}"#)),
            Err(SendFailure::MalformedResponse(_))
        ));
        assert!(matches!(
            whatsapp().classify(&ok(502, "<html>bad gateway</html>")),
            Err(SendFailure::MalformedResponse(_))
        ));
    }
}
