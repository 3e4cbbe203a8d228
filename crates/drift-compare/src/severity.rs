//! Post-hoc severity policy applied to an already-built diff: per-aspect
//! overrides, a minimum-severity floor, and warning suppression.

use crate::models::{BehavioralDiff, SeverityConfig};
use drift_baseline::Severity;

fn rollup(diff: &BehavioralDiff) -> (Severity, usize, usize, usize) {
    let breaking_count = diff.tools_removed.len()
        + diff.behavior_changes.iter().filter(|c| c.severity == Severity::Breaking).count();
    let warning_count = diff.behavior_changes.iter().filter(|c| c.severity == Severity::Warning).count();
    let info_count = diff.tools_added.len()
        + diff.behavior_changes.iter().filter(|c| c.severity == Severity::Info).count();

    let severity = if breaking_count > 0 {
        Severity::Breaking
    } else if warning_count > 0 {
        Severity::Warning
    } else if info_count > 0 {
        Severity::Info
    } else {
        Severity::None
    };

    (severity, breaking_count, warning_count, info_count)
}

fn summarize(diff: &BehavioralDiff, breaking: usize, warning: usize) -> String {
    format!(
        "{} tool(s) removed, {} added, {} modified; {} breaking, {} warning change(s)",
        diff.tools_removed.len(),
        diff.tools_added.len(),
        diff.tools_modified.len(),
        breaking,
        warning,
    )
}

/// Applies a [`SeverityConfig`] to a diff, returning a new, filtered diff.
pub fn apply_severity_config(diff: &BehavioralDiff, config: &SeverityConfig) -> BehavioralDiff {
    let mut changes = diff.behavior_changes.clone();

    for change in &mut changes {
        if let Some(&override_severity) = config.aspect_overrides.get(&change.aspect) {
            change.severity = override_severity;
        }
    }

    if let Some(minimum) = config.minimum_severity {
        changes.retain(|c| c.severity >= minimum);
    }

    if config.suppress_warnings {
        changes.retain(|c| c.severity != Severity::Warning);
    }

    let surviving_entities: std::collections::BTreeSet<String> =
        changes.iter().filter_map(|c| c.entity.clone()).collect();
    let tools_modified: Vec<String> =
        diff.tools_modified.iter().filter(|t| surviving_entities.contains(*t)).cloned().collect();

    let mut filtered = BehavioralDiff {
        version_compatibility: diff.version_compatibility.clone(),
        tools_added: diff.tools_added.clone(),
        tools_removed: diff.tools_removed.clone(),
        tools_modified,
        behavior_changes: changes,
        performance_report: diff.performance_report.clone(),
        security_report: diff.security_report.clone(),
        schema_evolution_report: diff.schema_evolution_report.clone(),
        error_trend_report: diff.error_trend_report.clone(),
        documentation_score_report: diff.documentation_score_report.clone(),
        severity: Severity::None,
        breaking_count: 0,
        warning_count: 0,
        info_count: 0,
        summary: String::new(),
    };

    let (severity, breaking_count, warning_count, info_count) = rollup(&filtered);
    filtered.summary = summarize(&filtered, breaking_count, warning_count);
    filtered.severity = severity;
    filtered.breaking_count = breaking_count;
    filtered.warning_count = warning_count;
    filtered.info_count = info_count;
    filtered
}

/// True iff the diff's overall severity meets or exceeds `threshold`.
pub fn should_fail_on_diff(diff: &BehavioralDiff, threshold: Severity) -> bool {
    diff.severity >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Aspect, BehaviorChange, VersionCompatibility};

    fn base_diff() -> BehavioralDiff {
        BehavioralDiff {
            version_compatibility: VersionCompatibility {
                previous_version: "1.0.0".to_string(),
                current_version: "1.0.0".to_string(),
                compatible: true,
            },
            tools_added: vec![],
            tools_removed: vec![],
            tools_modified: vec!["a".to_string()],
            behavior_changes: vec![BehaviorChange {
                entity: Some("a".to_string()),
                aspect: Aspect::Schema,
                severity: Severity::Warning,
                description: "tightened minLength".to_string(),
            }],
            performance_report: None,
            security_report: None,
            schema_evolution_report: None,
            error_trend_report: None,
            documentation_score_report: None,
            severity: Severity::Warning,
            breaking_count: 0,
            warning_count: 1,
            info_count: 0,
            summary: String::new(),
        }
    }

    #[test]
    fn suppress_warnings_drops_the_change_and_the_tool() {
        let diff = base_diff();
        let config = SeverityConfig { suppress_warnings: true, ..Default::default() };
        let filtered = apply_severity_config(&diff, &config);
        assert!(filtered.behavior_changes.is_empty());
        assert!(filtered.tools_modified.is_empty());
        assert_eq!(filtered.severity, Severity::None);
    }

    #[test]
    fn aspect_override_changes_severity() {
        let diff = base_diff();
        let mut overrides = std::collections::BTreeMap::new();
        overrides.insert(Aspect::Schema, Severity::Breaking);
        let config = SeverityConfig { aspect_overrides: overrides, ..Default::default() };
        let filtered = apply_severity_config(&diff, &config);
        assert_eq!(filtered.severity, Severity::Breaking);
        assert_eq!(filtered.breaking_count, 1);
    }

    #[test]
    fn minimum_severity_floor_drops_lesser_changes() {
        let diff = base_diff();
        let config = SeverityConfig { minimum_severity: Some(Severity::Breaking), ..Default::default() };
        let filtered = apply_severity_config(&diff, &config);
        assert!(filtered.behavior_changes.is_empty());
        assert_eq!(filtered.severity, Severity::None);
    }

    #[test]
    fn should_fail_on_diff_compares_against_threshold() {
        let diff = base_diff();
        assert!(should_fail_on_diff(&diff, Severity::Warning));
        assert!(!should_fail_on_diff(&diff, Severity::Breaking));
    }
}
