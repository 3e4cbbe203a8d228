//! Error type for the top-level engine facade.

use thiserror::Error;

/// Errors surfaced by [`crate::Engine`], wrapping the per-crate error
/// taxonomies of the components it composes.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Baseline(#[from] drift_baseline::BaselineError),

    #[error(transparent)]
    Compare(#[from] drift_compare::CompareError),
}
