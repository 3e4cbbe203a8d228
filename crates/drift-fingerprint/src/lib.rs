//! Turns raw sampled tool invocations into the stable fingerprints the
//! comparator diffs: response structure, inferred output schema, error
//! taxonomy, schema-evolution history, latency/confidence statistics, and
//! documentation quality.
//!
//! Each concern lives in its own module and is independently callable —
//! the baseline builder composes them per tool, but nothing here depends
//! on the baseline data model itself.

mod docscore;
mod error;
mod errors;
mod evolution;
mod inference;
mod models;
mod performance;
mod sample;
mod structure;

pub use docscore::{score_documentation, score_tool};
pub use error::FingerprintError;
pub use errors::{classify_error, extract_error_patterns, normalize_error};
pub use evolution::update_evolution;
pub use inference::infer_schema;
pub use models::{
    ConfidenceLevel, ContentType, DocumentationIssue, DocumentationScore, ErrorCategory, ErrorPattern, Grade,
    PerformanceConfidence, PerformanceStats, ResponseFingerprint, ResponseSchemaEvolution, SchemaHistoryEntry,
    SizeBucket, ToolDocInput, ToolDocumentationReport,
};
pub use performance::{compute_performance, detect_regression, RegressionResult};
pub use sample::{LatencySample, ResponseContent, ResponseSample};
pub use structure::{compute_fingerprint, FingerprintResult};
