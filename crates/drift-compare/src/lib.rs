//! The deterministic comparator: turns two baselines into a
//! severity-classified behavioral diff, plus the severity policy that
//! post-processes it.

mod aggregate;
mod comparator;
mod error;
mod gating;
mod models;
mod severity;

pub use comparator::compare_baselines;
pub use error::CompareError;
pub use gating::{is_gated_out, meets_gate, GATE_ANNOTATIONS, GATE_OUTPUT_SCHEMA, GATE_TASK_SUPPORT};
pub use models::{
    Aspect, BehaviorChange, BehavioralDiff, ComparatorOptions, DocumentationScoreReport, ErrorTrendReport,
    PerformanceRegressionReport, SchemaEvolutionReport, SecurityDiffReport, SeverityConfig, VersionCompatibility,
};
pub use severity::{apply_severity_config, should_fail_on_diff};
