//! Error types for canonicalization and hashing.

use thiserror::Error;

/// Errors raised while canonicalizing a JSON value.
///
/// Canonicalization and hashing never perform I/O, so this is the only
/// error surface in this crate: a value that cannot be represented in a
/// deterministic canonical form.
#[derive(Debug, Error, PartialEq)]
pub enum EncodingError {
    /// A `f64` was NaN or infinite. RFC 8785-style canonical JSON has no
    /// representation for either, and the spec treats them as a hard
    /// failure rather than silently coercing to `null`.
    #[error("cannot canonicalize non-finite number at {path}")]
    NonFiniteNumber {
        /// Dotted path to the offending value, for diagnostics.
        path: String,
    },

    /// A hash string did not have the expected 16 lowercase hex chars.
    #[error("invalid hash string {0:?}: expected 16 lowercase hex characters")]
    InvalidHash(String),
}
