//! # drift-core
//!
//! Unified facade over the drift-detection workspace for tool-exposing,
//! JSON-RPC-based capability servers.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         drift-core                             │
//! ├───────────────────────────────────────────────────────────────┤
//! │                      ┌─────────────┐                          │
//! │                      │   Engine    │  ← unified facade         │
//! │                      └──────┬──────┘                          │
//! │        ┌────────────────────┼────────────────────┐            │
//! │        ▼                    ▼                    ▼            │
//! │ ┌─────────────┐     ┌──────────────┐     ┌──────────────┐     │
//! │ │drift-baseline│    │ drift-compare│     │drift-fingerprint│   │
//! │ │ store/build  │    │  comparator  │     │  drift-schema   │   │
//! │ └─────────────┘     └──────────────┘     └──────────────┘     │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use drift_core::{Engine, EngineConfig};
//!
//! let engine = Engine::new(EngineConfig::default());
//! let previous = engine.load_baseline(Path::new("baseline.json"))?;
//! let current = engine.load_baseline(Path::new("current.json"))?;
//! let diff = engine.compare(&previous, &current)?;
//! if engine.should_fail(&diff) {
//!     std::process::exit(1);
//! }
//! ```

mod config;
mod engine;
mod error;

pub use config::{ComparatorSettings, EngineConfig, SeveritySettings, StoreSettings};
pub use engine::Engine;
pub use error::EngineError;

// Re-export component crates' public surfaces for convenience so callers
// don't need to depend on each one directly.
pub use drift_baseline::{
    self as baseline, Baseline, BaselineError, BuildInput, BuildResult, DeclaredTool, Severity,
    ToolProbeOutput,
};
pub use drift_compare::{
    self as compare, apply_severity_config, compare_baselines, should_fail_on_diff, Aspect,
    BehavioralDiff, BehaviorChange, ComparatorOptions, CompareError, SeverityConfig,
};
pub use drift_fingerprint as fingerprint;
pub use drift_hash as hash;
pub use drift_schema as schema;

/// Result type for [`Engine`] operations.
pub type Result<T> = std::result::Result<T, EngineError>;
