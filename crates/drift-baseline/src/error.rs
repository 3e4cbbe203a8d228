//! Error taxonomy for the baseline store: the only I/O-bearing component
//! in the workspace.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("baseline file not found: {path}")]
    NotFound { path: String },

    #[error("baseline file {path} is {actual} bytes, exceeding the {limit}-byte limit")]
    TooLarge { path: String, actual: u64, limit: u64 },

    #[error("baseline file {path} is not valid JSON: {source}")]
    InvalidJson { path: String, #[source] source: serde_json::Error },

    #[error("baseline at {path} fails shape validation: {reason}")]
    InvalidSchema { path: String, reason: String },

    #[error("baseline at {path} failed integrity check: expected hash {expected}, got {actual}")]
    IntegrityFailure { path: String, expected: String, actual: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Encoding(#[from] drift_hash::EncodingError),
}
