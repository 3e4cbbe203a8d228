//! Error types for this crate.

use thiserror::Error;

/// Errors surfaced while fingerprinting a batch of response samples.
///
/// Fingerprinting performs no I/O; the only failure surface is a value
/// that the canonicalizer cannot hash.
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error(transparent)]
    Encoding(#[from] drift_hash::EncodingError),
}
