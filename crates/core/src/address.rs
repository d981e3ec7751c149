//! Content address types and parsing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a CIDv0 address: "Qm" plus 44 base58 characters.
const CIDV0_LEN: usize = 46;

/// Minimum length of a base32 CIDv1 address ("b" multibase prefix).
const CIDV1_MIN_LEN: usize = 59;

/// A validated content address (CID).
///
/// Validation is purely structural and performs no I/O. Two forms are
/// accepted:
/// - CIDv0: `Qm` followed by 44 base58 characters
/// - CIDv1: `b` followed by at least 58 lowercase base32 characters
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentAddress(String);

impl ContentAddress {
    /// Parse and validate an address string.
    pub fn parse(s: impl Into<String>) -> crate::Result<Self> {
        let s = s.into();

        if !s.is_ascii() {
            return Err(crate::Error::MalformedAddress(
                "address contains non-ASCII characters".to_string(),
            ));
        }

        if s.starts_with("Qm") {
            if s.len() != CIDV0_LEN {
                return Err(crate::Error::MalformedAddress(format!(
                    "CIDv0 address must be {CIDV0_LEN} chars, got {}",
                    s.len()
                )));
            }
            for c in s[2..].chars() {
                if !is_base58(c) {
                    return Err(crate::Error::MalformedAddress(format!(
                        "invalid base58 character in address: {c}"
                    )));
                }
            }
            return Ok(Self(s));
        }

        if let Some(rest) = s.strip_prefix('b') {
            if s.len() < CIDV1_MIN_LEN {
                return Err(crate::Error::MalformedAddress(format!(
                    "CIDv1 address must be at least {CIDV1_MIN_LEN} chars, got {}",
                    s.len()
                )));
            }
            for c in rest.chars() {
                if !matches!(c, 'a'..='z' | '2'..='7') {
                    return Err(crate::Error::MalformedAddress(format!(
                        "invalid base32 character in address: {c}"
                    )));
                }
            }
            return Ok(Self(s));
        }

        Err(crate::Error::MalformedAddress(format!(
            "unrecognized address prefix: {s}"
        )))
    }

    /// Get the address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Base58 (Bitcoin alphabet): alphanumeric without 0, O, I, l.
fn is_base58(c: char) -> bool {
    c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l')
}

impl TryFrom<String> for ContentAddress {
    type Error = crate::Error;

    fn try_from(s: String) -> crate::Result<Self> {
        Self::parse(s)
    }
}

impl From<ContentAddress> for String {
    fn from(addr: ContentAddress) -> Self {
        addr.0
    }
}

impl fmt::Debug for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentAddress({self})")
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
