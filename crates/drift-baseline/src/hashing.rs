//! Baseline content-addressed hashing: computing, verifying, and
//! recalculating the `hash` field that closes out every baseline.

use crate::error::BaselineError;
use crate::models::Baseline;
use drift_hash::Hash16;

/// Computes the canonical hash of a baseline with its `hash` field
/// excluded, per the data model's hash invariant.
pub fn compute_baseline_hash(baseline: &Baseline) -> Result<Hash16, BaselineError> {
    let mut value = serde_json::to_value(baseline)
        .map_err(|source| BaselineError::InvalidJson { path: "<in-memory>".to_string(), source })?;
    if let Some(obj) = value.as_object_mut() {
        obj.remove("hash");
    }
    Ok(drift_hash::hash(&value)?)
}

/// Strips `hash`, recomputes it, and compares against the stored value.
pub fn verify_baseline_hash(baseline: &Baseline) -> Result<bool, BaselineError> {
    Ok(compute_baseline_hash(baseline)? == baseline.hash)
}

/// Attaches a freshly computed hash, overwriting whatever was there.
/// Idempotent: applying it twice in a row yields the same baseline.
pub fn recalculate_baseline_hash(mut baseline: Baseline) -> Result<Baseline, BaselineError> {
    baseline.hash = compute_baseline_hash(&baseline)?;
    Ok(baseline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_baseline;

    #[test]
    fn recalculate_is_a_fixed_point() {
        let baseline = recalculate_baseline_hash(sample_baseline()).unwrap();
        let again = recalculate_baseline_hash(baseline.clone()).unwrap();
        assert_eq!(baseline.hash, again.hash);
    }

    #[test]
    fn verify_succeeds_after_recalculation() {
        let baseline = recalculate_baseline_hash(sample_baseline()).unwrap();
        assert!(verify_baseline_hash(&baseline).unwrap());
    }

    #[test]
    fn verify_fails_after_tampering() {
        let mut baseline = recalculate_baseline_hash(sample_baseline()).unwrap();
        baseline.server.name = "tampered".to_string();
        assert!(!verify_baseline_hash(&baseline).unwrap());
    }
}
