//! Atomic on-disk persistence for baselines.

use crate::error::BaselineError;
use crate::hashing::{recalculate_baseline_hash, verify_baseline_hash};
use crate::models::{Acceptance, Baseline};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Default ceiling on a baseline file's size, guarding against loading an
/// unbounded or corrupted file into memory.
pub const MAX_BASELINE_SIZE: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub max_size: u64,
    pub skip_integrity_check: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { max_size: MAX_BASELINE_SIZE, skip_integrity_check: false }
    }
}

/// Writes a baseline to `path` atomically: serialize to a temp file in the
/// same directory, flush and sync, then rename over the destination so a
/// reader never observes a partially written file.
pub fn save(baseline: &Baseline, path: &Path) -> Result<(), BaselineError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    let json = serde_json::to_string_pretty(baseline)
        .map_err(|source| BaselineError::InvalidJson { path: path.display().to_string(), source })?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    if let Ok(dir_handle) = fs::File::open(dir) {
        let _ = dir_handle.sync_all();
    }

    Ok(())
}

/// Loads and validates a baseline file.
pub fn load(path: &Path, options: LoadOptions) -> Result<Baseline, BaselineError> {
    if !path.exists() {
        return Err(BaselineError::NotFound { path: path.display().to_string() });
    }

    let metadata = fs::metadata(path)?;
    if metadata.len() > options.max_size {
        return Err(BaselineError::TooLarge {
            path: path.display().to_string(),
            actual: metadata.len(),
            limit: options.max_size,
        });
    }

    let contents = fs::read_to_string(path)?;
    let baseline: Baseline = serde_json::from_str(&contents)
        .map_err(|source| BaselineError::InvalidJson { path: path.display().to_string(), source })?;

    if baseline.capabilities.tools.iter().any(|t| t.name.is_empty()) {
        return Err(BaselineError::InvalidSchema {
            path: path.display().to_string(),
            reason: "tool with empty name".to_string(),
        });
    }

    if !options.skip_integrity_check {
        let expected = crate::hashing::compute_baseline_hash(&baseline)?;
        if expected != baseline.hash {
            return Err(BaselineError::IntegrityFailure {
                path: path.display().to_string(),
                expected: expected.to_string(),
                actual: baseline.hash.to_string(),
            });
        }
    }

    Ok(baseline)
}

pub fn baseline_exists(path: &Path) -> bool {
    path.exists()
}

/// Stamps a baseline as having accepted a previously observed diff,
/// recording who/why/what and rehashing to close out the new document.
pub fn accept_drift(
    mut baseline: Baseline,
    accepted_diff: serde_json::Value,
    accepted_by: Option<String>,
    reason: Option<String>,
    accepted_at: chrono::DateTime<chrono::Utc>,
) -> Result<Baseline, BaselineError> {
    baseline.acceptance = Some(Acceptance { accepted_at, accepted_by, reason, accepted_diff });
    recalculate_baseline_hash(baseline)
}

/// Removes any acceptance record and rehashes.
pub fn clear_acceptance(mut baseline: Baseline) -> Result<Baseline, BaselineError> {
    baseline.acceptance = None;
    recalculate_baseline_hash(baseline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_baseline;
    use chrono::Utc;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        let baseline = recalculate_baseline_hash(sample_baseline()).unwrap();

        save(&baseline, &path).unwrap();
        let loaded = load(&path, LoadOptions::default()).unwrap();

        assert_eq!(baseline, loaded);
    }

    #[test]
    fn load_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = load(&path, LoadOptions::default()).unwrap_err();
        assert!(matches!(err, BaselineError::NotFound { .. }));
    }

    #[test]
    fn load_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        let baseline = recalculate_baseline_hash(sample_baseline()).unwrap();
        save(&baseline, &path).unwrap();

        let err = load(&path, LoadOptions { max_size: 1, skip_integrity_check: false }).unwrap_err();
        assert!(matches!(err, BaselineError::TooLarge { .. }));
    }

    #[test]
    fn load_rejects_tampered_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        let mut baseline = recalculate_baseline_hash(sample_baseline()).unwrap();
        save(&baseline, &path).unwrap();

        baseline.server.name = "tampered".to_string();
        let json = serde_json::to_string_pretty(&baseline).unwrap();
        fs::write(&path, json).unwrap();

        let err = load(&path, LoadOptions::default()).unwrap_err();
        assert!(matches!(err, BaselineError::IntegrityFailure { .. }));
    }

    #[test]
    fn accept_then_clear_round_trips_hash() {
        let baseline = recalculate_baseline_hash(sample_baseline()).unwrap();
        let accepted = accept_drift(
            baseline,
            serde_json::json!({"changes": []}),
            Some("alice".to_string()),
            Some("known rename".to_string()),
            Utc::now(),
        )
        .unwrap();
        assert!(verify_baseline_hash(&accepted).unwrap());
        assert!(accepted.has_acceptance());

        let cleared = clear_acceptance(accepted).unwrap();
        assert!(verify_baseline_hash(&cleared).unwrap());
        assert!(!cleared.has_acceptance());
    }
}
