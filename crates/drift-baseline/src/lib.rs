//! Immutable baseline data model, builder, content-addressed hashing, and
//! atomic file store.

mod builder;
mod error;
mod hashing;
mod models;
mod store;

#[cfg(test)]
mod test_support;

pub use builder::{build_baseline, BuildInput, BuildResult, DeclaredTool, ToolProbeOutput};
pub use error::BaselineError;
pub use hashing::{compute_baseline_hash, recalculate_baseline_hash, verify_baseline_hash};
pub use models::{
    Acceptance, Assertion, AssertionKind, Baseline, Capabilities, ExecutionInfo, Metadata, ProbeMode,
    PromptArgument, PromptCapability, ResourceAnnotations, ResourceCapability, ResourceTemplateCapability,
    RiskLevel, SecurityFinding, SecurityFingerprint, ServerInfo, Severity, TaskSupport, ToolAnnotations,
    ToolCapability, ToolProfile, WorkflowOutcome,
};
pub use store::{accept_drift, baseline_exists, clear_acceptance, load, save, LoadOptions, MAX_BASELINE_SIZE};
