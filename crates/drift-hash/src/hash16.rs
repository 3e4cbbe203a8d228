//! The 16-lowercase-hex-char hash newtype used throughout the workspace.

use crate::error::EncodingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A content-addressed hash, truncated to the first 16 lowercase hex
/// characters of a SHA-256 digest.
///
/// This is a *display* format, not the full digest: it trades a small
/// amount of collision resistance for the compact identifiers the data
/// model and diff output need. Validated on construction so that every
/// `Hash16` a caller can hold is well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hash16(String);

impl Hash16 {
    /// Builds a `Hash16` from a full hex digest, truncating to the first
    /// 16 characters. Used internally once a digest is known to be valid
    /// hex; not part of the public validating constructor surface.
    pub(crate) fn from_digest_hex(prefix: &str) -> Self {
        debug_assert!(prefix.len() == 16);
        debug_assert!(prefix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        Self(prefix.to_string())
    }

    /// Returns the hash as a borrowed string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), EncodingError> {
        let ok = s.len() == 16
            && s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if ok {
            Ok(())
        } else {
            Err(EncodingError::InvalidHash(s.to_string()))
        }
    }
}

impl TryFrom<String> for Hash16 {
    type Error = EncodingError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::validate(&s)?;
        Ok(Self(s))
    }
}

impl TryFrom<&str> for Hash16 {
    type Error = EncodingError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }
}

impl FromStr for Hash16 {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl fmt::Display for Hash16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Hash16 {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_hash() {
        assert!(Hash16::try_from("0123456789abcdef").is_ok());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Hash16::try_from("0123").is_err());
    }

    #[test]
    fn rejects_uppercase() {
        assert!(Hash16::try_from("0123456789ABCDEF").is_err());
    }

    #[test]
    fn rejects_non_hex() {
        assert!(Hash16::try_from("0123456789abcdeg").is_err());
    }

    #[test]
    fn round_trips_through_display_and_parse() {
        let h = Hash16::try_from("0123456789abcdef").unwrap();
        let s = h.to_string();
        let h2: Hash16 = s.parse().unwrap();
        assert_eq!(h, h2);
    }
}
