//! Per-call diagnostics attached to send outcomes

use crate::transport::{HttpRequest, HttpResponse, TransportError};
use crate::util::truncate_chars;
use crate::util::MAX_LOG_BODY_LENGTH;
use serde::Serialize;
use std::time::Duration;

/// One diagnostic entry: an HTTP exchange or a local failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelLog {
    /// What was being attempted
    pub description: String,
    /// HTTP method, if a call was made
    pub method: Option<String>,
    /// URL, if a call was made
    pub url: Option<String>,
    /// Response status, if one was received
    pub status_code: Option<u16>,
    /// Request body (JSON only; binary bodies are summarized)
    pub request_body: Option<String>,
    /// Response body, truncated
    pub response_body: Option<String>,
    /// Wall time of the call
    pub elapsed_ms: u64,
    /// Error text, if this step failed
    pub error: Option<String>,
}

impl ChannelLog {
    /// Record an HTTP exchange
    #[must_use]
    pub fn from_exchange(
        description: impl Into<String>,
        request: &HttpRequest,
        result: &Result<HttpResponse, TransportError>,
        elapsed: Duration,
    ) -> Self {
        let (status_code, response_body, error) = match result {
            Ok(resp) => (
                Some(resp.status),
                Some(truncate_chars(&resp.text(), MAX_LOG_BODY_LENGTH)),
                None,
            ),
            Err(e) => (None, None, Some(e.to_string())),
        };

        Self {
            description: description.into(),
            method: Some(request.method.to_string()),
            url: Some(request.url.clone()),
            status_code,
            request_body: request.loggable_body(),
            response_body,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            error,
        }
    }

    /// Record a failure that happened without an HTTP exchange
    #[must_use]
    pub fn from_error(description: impl Into<String>, error: impl ToString) -> Self {
        Self {
            description: description.into(),
            method: None,
            url: None,
            status_code: None,
            request_body: None,
            response_body: None,
            elapsed_ms: 0,
            error: Some(error.to_string()),
        }
    }

    /// Attach (or replace) the error text
    #[must_use]
    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Whether this entry records a failure
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
