//! Media relay: fetch attachment bytes and re-upload them to the provider
//!
//! Providers want a media handle, not a URL we host. The relay downloads
//! the bytes untouched and posts them to the provider's upload endpoint.
//! Nothing here retries.

use crate::channel_log::ChannelLog;
use crate::error::MediaError;
use crate::transport::{HttpRequest, HttpTransport};
use std::time::Instant;
use tracing::{debug, warn};

/// Where the provider puts the handle in an upload response
pub const MEDIA_ID_POINTER: &str = "/media/0/id";

/// Relays one attachment through a transport
pub struct MediaRelay<'a> {
    transport: &'a dyn HttpTransport,
}

impl<'a> MediaRelay<'a> {
    /// Create a relay over `transport`
    #[must_use]
    pub fn new(transport: &'a dyn HttpTransport) -> Self {
        Self { transport }
    }

    /// Fetch `source_url` and upload it to `upload_url`, returning the
    /// provider media handle. Every HTTP exchange is appended to `logs`.
    pub async fn relay(
        &self,
        source_url: &str,
        mime_type: &str,
        upload_url: &str,
        token: &str,
        logs: &mut Vec<ChannelLog>,
    ) -> Result<String, MediaError> {
        let fetch = HttpRequest::get(source_url);
        let started = Instant::now();
        let result = self.transport.perform(fetch.clone()).await;
        let mut log = ChannelLog::from_exchange("Media Fetch", &fetch, &result, started.elapsed());

        let bytes = match result {
            Ok(resp) if resp.is_success() => resp.body,
            Ok(resp) => {
                let err = MediaError::Fetch(format!("unexpected status {}", resp.status));
                log = log.with_error(&err);
                logs.push(log);
                return Err(err);
            }
            Err(e) => {
                let err = MediaError::Fetch(e.to_string());
                logs.push(log.with_error(&err));
                return Err(err);
            }
        };
        logs.push(log);
        debug!(size = bytes.len(), mime_type, "fetched attachment");

        let upload = HttpRequest::post(upload_url)
            .bearer(token)
            .header("Content-Type", mime_type)
            .raw_body(bytes);
        let started = Instant::now();
        let result = self.transport.perform(upload.clone()).await;
        let mut log = ChannelLog::from_exchange("Media Upload", &upload, &result, started.elapsed());

        let response = match result {
            Ok(resp) if resp.is_success() => resp,
            Ok(resp) => {
                let err = MediaError::Upload(format!("unexpected status {}", resp.status));
                log = log.with_error(&err);
                logs.push(log);
                return Err(err);
            }
            Err(e) => {
                let err = MediaError::Upload(e.to_string());
                logs.push(log.with_error(&err));
                return Err(err);
            }
        };

        let media_id = response
            .json()
            .as_ref()
            .and_then(|body| body.pointer(MEDIA_ID_POINTER))
            .and_then(serde_json::Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        match media_id {
            Some(id) => {
                logs.push(log);
                Ok(id)
            }
            None => {
                let err = MediaError::MalformedUpload(
                    "unable to read media id from upload response".to_string(),
                );
                warn!(upload_url, "upload response had no media id");
                logs.push(log.with_error(&err));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedTransport;
    use crate::transport::{HttpResponse, TransportError};

    const SOURCE: &str = "https://s3.example.com/photo.jpg";
    const UPLOAD: &str = "https://foo.bar/v1/media";

    #[tokio::test]
    async fn test_relay_success() {
        let transport = ScriptedTransport::new(vec![
            Ok(HttpResponse::new(200, b"jpegbytes".to_vec())),
            Ok(HttpResponse::new(201, r#"{"media":[{"id":"f043afd0"}]}"#)),
        ]);
        let mut logs = Vec::new();

        let id = MediaRelay::new(&transport)
            .relay(SOURCE, "image/jpeg", UPLOAD, "token123", &mut logs)
            .await
            .unwrap();

        assert_eq!(id, "f043afd0");
        assert_eq!(logs.len(), 2);

        let requests = transport.requests().await;
        assert_eq!(requests[0].url, SOURCE);
        assert_eq!(requests[1].url, UPLOAD);
        assert_eq!(requests[1].body.as_deref(), Some(&b"jpegbytes"[..]));
        assert_eq!(requests[1].header_value("Content-Type"), Some("image/jpeg"));
        assert_eq!(
            requests[1].header_value("Authorization"),
            Some("Bearer token123")
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_upload() {
        let transport =
            ScriptedTransport::new(vec![Err(TransportError("connection refused".into()))]);
        let mut logs = Vec::new();

        let err = MediaRelay::new(&transport)
            .relay(SOURCE, "image/jpeg", UPLOAD, "token123", &mut logs)
            .await
            .unwrap_err();

        assert_eq!(err, MediaError::Fetch("connection refused".into()));
        assert_eq!(transport.requests().await.len(), 1);
        assert_eq!(
            logs[0].error.as_deref(),
            Some("media fetch failed: connection refused")
        );
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(404, "missing"))]);
        let mut logs = Vec::new();

        let err = MediaRelay::new(&transport)
            .relay(SOURCE, "image/jpeg", UPLOAD, "token123", &mut logs)
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_upload_failure() {
        let transport = ScriptedTransport::new(vec![
            Ok(HttpResponse::new(200, b"bytes".to_vec())),
            Err(TransportError("timed out".into())),
        ]);
        let mut logs = Vec::new();

        let err = MediaRelay::new(&transport)
            .relay(SOURCE, "audio/ogg", UPLOAD, "token123", &mut logs)
            .await
            .unwrap_err();

        assert_eq!(err, MediaError::Upload("timed out".into()));
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[1].error.as_deref(), Some("media upload failed: timed out"));
    }

    #[tokio::test]
    async fn test_upload_without_media_id() {
        let transport = ScriptedTransport::new(vec![
            Ok(HttpResponse::new(200, b"bytes".to_vec())),
            Ok(HttpResponse::new(200, r#"{"media":[]}"#)),
        ]);
        let mut logs = Vec::new();

        let err = MediaRelay::new(&transport)
            .relay(SOURCE, "audio/ogg", UPLOAD, "token123", &mut logs)
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::MalformedUpload(_)));
        assert!(logs[1].is_error());
    }
}
