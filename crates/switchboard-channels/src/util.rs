//! Common utilities for channel adapters
//!
//! Helpers shared by both provider kinds: text segmentation, timestamp
//! parsing and log masking.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};

// ============================================================================
// Logging and Security Constants
// ============================================================================

/// Maximum length of text to log (to prevent sensitive data exposure)
pub const MAX_LOG_TEXT_LENGTH: usize = 50;

/// Maximum length of a logged provider response body
pub const MAX_LOG_BODY_LENGTH: usize = 1024;

// ============================================================================
// Platform Message Length Limits
// ============================================================================

/// Provider text limit, counted in characters
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Patterns that indicate potentially sensitive content
pub const SENSITIVE_PATTERNS: &[&str] = &[
    "password",
    "passwd",
    "secret",
    "token",
    "api_key",
    "apikey",
    "bearer",
    "authorization",
    "credential",
    "private",
];

/// Mask potentially sensitive text for logging
///
/// # Examples
/// ```
/// use switchboard_channels::util::mask_for_logging;
///
/// assert!(mask_for_logging("my password is secret123").contains("REDACTED"));
/// assert_eq!(mask_for_logging("Hello"), "Hello");
/// ```
#[must_use]
pub fn mask_for_logging(text: &str) -> String {
    let lower = text.to_lowercase();

    for pattern in SENSITIVE_PATTERNS {
        if lower.contains(pattern) {
            return "[REDACTED - potentially sensitive content]".to_string();
        }
    }

    truncate_chars(text, MAX_LOG_TEXT_LENGTH)
}

/// Truncate on a character boundary, marking the cut
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...[truncated]", &text[..idx]),
        None => text.to_string(),
    }
}

/// Split text into segments of at most `max` characters
///
/// Each cut is made at the last whitespace inside the window so words stay
/// whole; a window with no usable whitespace is cut hard at `max`. Whitespace
/// at a cut is dropped.
///
/// # Examples
/// ```
/// use switchboard_channels::util::split_message;
///
/// assert_eq!(split_message("hello world", 8), vec!["hello", "world"]);
/// assert_eq!(split_message("short", 8), vec!["short"]);
/// ```
#[must_use]
pub fn split_message(text: &str, max: usize) -> Vec<String> {
    if max == 0 || text.chars().count() <= max {
        return vec![text.to_string()];
    }

    let mut parts = Vec::new();
    let mut rest = text;

    while rest.chars().count() > max {
        let limit = rest
            .char_indices()
            .nth(max)
            .map_or(rest.len(), |(idx, _)| idx);
        let window = &rest[..limit];

        let boundary = window
            .rfind(char::is_whitespace)
            .filter(|&idx| !window[..idx].trim().is_empty());

        match boundary {
            Some(idx) => {
                parts.push(window[..idx].trim_end().to_string());
                rest = rest[idx..].trim_start();
            }
            None => {
                parts.push(window.to_string());
                rest = rest[limit..].trim_start();
            }
        }
    }

    if !rest.trim().is_empty() {
        parts.push(rest.to_string());
    }

    parts
}

/// Parse a provider timestamp
///
/// Accepts RFC 3339 (nanosecond precision allowed) or Unix epoch seconds
/// written as a decimal string. The result is normalized to UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(parsed) = raw
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
        {
            return Ok(parsed);
        }
    }

    Err(Error::InvalidTimestamp(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_mask_for_logging_sensitive() {
        assert!(mask_for_logging("my password is secret123").contains("REDACTED"));
        assert!(mask_for_logging("Bearer eyJhbGciOiJ").contains("REDACTED"));
    }

    #[test]
    fn test_mask_for_logging_truncate_multibyte() {
        let long_msg = "☺".repeat(100);
        let masked = mask_for_logging(&long_msg);
        assert!(masked.contains("truncated"));
        assert!(masked.starts_with(&"☺".repeat(MAX_LOG_TEXT_LENGTH)));
    }

    #[test]
    fn test_split_at_limit_is_single_segment() {
        let text = "a".repeat(MAX_MESSAGE_LENGTH);
        let parts = split_message(&text, MAX_MESSAGE_LENGTH);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0], text);
    }

    #[test]
    fn test_split_hard_cut_without_whitespace() {
        let text = "a".repeat(MAX_MESSAGE_LENGTH + 1);
        let parts = split_message(&text, MAX_MESSAGE_LENGTH);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].chars().count(), MAX_MESSAGE_LENGTH);
        assert_eq!(parts[1], "a");
    }

    #[test]
    fn test_split_drops_whitespace_only_remainder() {
        let text = format!("{}\n", "a".repeat(MAX_MESSAGE_LENGTH));
        let parts = split_message(&text, MAX_MESSAGE_LENGTH);
        assert_eq!(parts, vec!["a".repeat(MAX_MESSAGE_LENGTH)]);
    }

    #[test]
    fn test_split_hard_cut_trims_next_segment() {
        let text = format!("{}  tail", "a".repeat(10));
        let parts = split_message(&text, 10);
        assert_eq!(parts, vec!["a".repeat(10), "tail".to_string()]);
    }

    #[test]
    fn test_split_on_word_boundary() {
        let parts = split_message("the quick brown fox jumps", 10);
        assert_eq!(parts, vec!["the quick", "brown fox", "jumps"]);
        for part in &parts {
            assert!(part.chars().count() <= 10);
        }
    }

    #[test]
    fn test_split_counts_characters_not_bytes() {
        let text = "☺".repeat(10);
        let parts = split_message(&text, 4);
        assert_eq!(parts, vec!["☺☺☺☺", "☺☺☺☺", "☺☺"]);
    }

    #[test]
    fn test_split_ignores_leading_whitespace_boundary() {
        let text = format!(" {}", "b".repeat(12));
        let parts = split_message(&text, 8);
        assert_eq!(parts[0], format!(" {}", "b".repeat(7)));
        assert!(parts.iter().all(|p| p.chars().count() <= 8));
    }

    #[test]
    fn test_parse_rfc3339_nanos() {
        let ts = parse_timestamp("2018-12-31T15:01:23.045123456Z").unwrap();
        assert_eq!(ts.year(), 2018);
        assert_eq!(ts.second(), 23);
        assert_eq!(ts.nanosecond(), 45_123_456);
    }

    #[test]
    fn test_parse_rfc3339_offset_normalized_to_utc() {
        let ts = parse_timestamp("2018-12-31T17:01:23+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2018, 12, 31, 15, 1, 23).unwrap());
    }

    #[test]
    fn test_parse_epoch_seconds() {
        let ts = parse_timestamp("1518694235").unwrap();
        assert_eq!(ts, Utc.timestamp_opt(1_518_694_235, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_other_formats() {
        assert!(parse_timestamp("20170623T123000Z").is_err());
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("-5").is_err());
        assert!(parse_timestamp("12.5").is_err());
    }
}
