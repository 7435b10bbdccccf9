//! Contact identities
//!
//! Provider addresses are turned into `scheme:path` identities here so the
//! rest of the platform never sees a raw phone number format.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use std::sync::LazyLock;

/// WhatsApp ids are bare digits (country code included, no `+`)
static WHATSAPP_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,15}$").expect("valid regex"));

/// E.164 with an optional leading `+`
static E164: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{6,14}$").expect("valid regex"));

/// Scheme for WhatsApp identities
pub const WHATSAPP_SCHEME: &str = "whatsapp";

/// Scheme for RBM identities
pub const RBM_SCHEME: &str = "rbm";

/// A normalized contact identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Urn {
    scheme: &'static str,
    path: String,
}

impl Urn {
    /// Build a WhatsApp identity from a provider `from`/`to` value
    pub fn whatsapp(address: &str) -> Result<Self> {
        let digits = address.trim().trim_start_matches('+');
        if !WHATSAPP_ID.is_match(digits) {
            return Err(Error::InvalidIdentity {
                scheme: WHATSAPP_SCHEME,
                address: address.to_string(),
            });
        }
        Ok(Self {
            scheme: WHATSAPP_SCHEME,
            path: digits.to_string(),
        })
    }

    /// Build an RBM identity from a phone number, normalized to `+<digits>`
    pub fn rbm(address: &str) -> Result<Self> {
        let trimmed = address.trim();
        if !E164.is_match(trimmed) {
            return Err(Error::InvalidIdentity {
                scheme: RBM_SCHEME,
                address: address.to_string(),
            });
        }
        Ok(Self {
            scheme: RBM_SCHEME,
            path: format!("+{}", trimmed.trim_start_matches('+')),
        })
    }

    /// Identity scheme
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.scheme
    }

    /// Scheme-specific address (what providers call `to`)
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Display for Urn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.scheme, self.path)
    }
}

impl FromStr for Urn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((WHATSAPP_SCHEME, path)) => Self::whatsapp(path),
            Some((RBM_SCHEME, path)) => Self::rbm(path),
            _ => Err(Error::Validation(format!("unsupported identity: {s}"))),
        }
    }
}

impl Serialize for Urn {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Urn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_identity() {
        let urn = Urn::whatsapp("16315555555").unwrap();
        assert_eq!(urn.to_string(), "whatsapp:16315555555");
        assert_eq!(urn.path(), "16315555555");

        // a leading plus is tolerated and dropped
        assert_eq!(Urn::whatsapp("+16315555555").unwrap(), urn);

        assert!(Urn::whatsapp("not a number").is_err());
        assert!(Urn::whatsapp("").is_err());
    }

    #[test]
    fn test_rbm_identity() {
        let urn = Urn::rbm("+12223334444").unwrap();
        assert_eq!(urn.to_string(), "rbm:+12223334444");
        assert_eq!(Urn::rbm("12223334444").unwrap(), urn);

        let err = Urn::rbm("not a number").unwrap_err();
        assert_eq!(err.to_string(), "invalid rbm number: not a number");
        assert!(Urn::rbm("+123").is_err());
    }

    #[test]
    fn test_parse_round_trip_through_serde() {
        let urn: Urn = "rbm:+250788123123".parse().unwrap();
        let json = serde_json::to_string(&urn).unwrap();
        assert_eq!(json, "\"rbm:+250788123123\"");
        let back: Urn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, urn);

        assert!("tel:+250788123123".parse::<Urn>().is_err());
    }
}
