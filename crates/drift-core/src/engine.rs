//! The unified drift-engine facade.
//!
//! [`Engine`] ties together the baseline store and the comparator behind
//! a single configuration object, so a caller building a CLI or service
//! around this workspace doesn't need to import every component crate
//! directly.

use crate::config::EngineConfig;
use crate::error::EngineError;
use drift_baseline::{Baseline, LoadOptions};
use drift_compare::{apply_severity_config, compare_baselines, BehavioralDiff, ComparatorOptions, SeverityConfig};
use std::path::Path;
use tracing::debug;

/// Owns an [`EngineConfig`] and exposes the load → compare → apply-policy
/// pipeline as a single call.
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Loads a baseline from disk using this engine's store settings.
    pub fn load_baseline(&self, path: &Path) -> Result<Baseline, EngineError> {
        let options: LoadOptions = (&self.config.store).into();
        debug!(path = %path.display(), "loading baseline");
        Ok(drift_baseline::load(path, options)?)
    }

    /// Writes a baseline to disk atomically.
    pub fn save_baseline(&self, baseline: &Baseline, path: &Path) -> Result<(), EngineError> {
        Ok(drift_baseline::save(baseline, path)?)
    }

    /// Compares two in-memory baselines and applies this engine's
    /// severity policy to the result.
    pub fn compare(&self, previous: &Baseline, current: &Baseline) -> Result<BehavioralDiff, EngineError> {
        let options: ComparatorOptions = (&self.config.comparator).into();
        let diff = compare_baselines(previous, current, &options)?;
        let severity_config: SeverityConfig = (&self.config.severity).into();
        Ok(apply_severity_config(&diff, &severity_config))
    }

    /// Loads both baselines from disk and runs [`Engine::compare`].
    pub fn compare_files(&self, previous_path: &Path, current_path: &Path) -> Result<BehavioralDiff, EngineError> {
        let previous = self.load_baseline(previous_path)?;
        let current = self.load_baseline(current_path)?;
        self.compare(&previous, &current)
    }

    /// True iff the diff's severity meets or exceeds the configured
    /// failure threshold. Falls back to `false` (never fail) when no
    /// threshold is configured.
    pub fn should_fail(&self, diff: &BehavioralDiff) -> bool {
        match self.config.severity.fail_on_severity {
            Some(threshold) => drift_compare::should_fail_on_diff(diff, threshold),
            None => false,
        }
    }
}
