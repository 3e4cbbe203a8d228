//! Configuration types for the drift engine facade.

use drift_baseline::{LoadOptions, Severity, MAX_BASELINE_SIZE};
use drift_compare::{ComparatorOptions, SeverityConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level configuration aggregating store, comparator, and severity
/// policy settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub store: StoreSettings,
    pub comparator: ComparatorSettings,
    pub severity: SeveritySettings,
}

/// Baseline-file load settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Maximum accepted baseline file size, in bytes.
    pub max_size: u64,
    /// Skip the content-hash integrity check on load.
    pub skip_integrity_check: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { max_size: MAX_BASELINE_SIZE, skip_integrity_check: false }
    }
}

impl From<&StoreSettings> for LoadOptions {
    fn from(settings: &StoreSettings) -> Self {
        LoadOptions { max_size: settings.max_size, skip_integrity_check: settings.skip_integrity_check }
    }
}

/// Which aspects the comparator considers, and its tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparatorSettings {
    pub ignore_version_mismatch: bool,
    pub ignore_schema_changes: bool,
    pub ignore_description_changes: bool,
    pub ignore_response_structure_changes: bool,
    pub ignore_error_pattern_changes: bool,
    pub ignore_security_changes: bool,
    pub ignore_output_schema_changes: bool,
    pub tools: Vec<String>,
    pub performance_threshold: f64,
}

impl Default for ComparatorSettings {
    fn default() -> Self {
        let defaults = ComparatorOptions::default();
        Self {
            ignore_version_mismatch: defaults.ignore_version_mismatch,
            ignore_schema_changes: defaults.ignore_schema_changes,
            ignore_description_changes: defaults.ignore_description_changes,
            ignore_response_structure_changes: defaults.ignore_response_structure_changes,
            ignore_error_pattern_changes: defaults.ignore_error_pattern_changes,
            ignore_security_changes: defaults.ignore_security_changes,
            ignore_output_schema_changes: defaults.ignore_output_schema_changes,
            tools: defaults.tools,
            performance_threshold: defaults.performance_threshold,
        }
    }
}

impl From<&ComparatorSettings> for ComparatorOptions {
    fn from(settings: &ComparatorSettings) -> Self {
        ComparatorOptions {
            ignore_version_mismatch: settings.ignore_version_mismatch,
            ignore_schema_changes: settings.ignore_schema_changes,
            ignore_description_changes: settings.ignore_description_changes,
            ignore_response_structure_changes: settings.ignore_response_structure_changes,
            ignore_error_pattern_changes: settings.ignore_error_pattern_changes,
            ignore_security_changes: settings.ignore_security_changes,
            ignore_output_schema_changes: settings.ignore_output_schema_changes,
            tools: settings.tools.clone(),
            performance_threshold: settings.performance_threshold,
        }
    }
}

/// Post-hoc severity policy applied to every comparison the engine runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeveritySettings {
    pub minimum_severity: Option<Severity>,
    pub fail_on_severity: Option<Severity>,
    pub suppress_warnings: bool,
    pub aspect_overrides: BTreeMap<String, Severity>,
}

impl From<&SeveritySettings> for SeverityConfig {
    fn from(settings: &SeveritySettings) -> Self {
        let aspect_overrides = settings
            .aspect_overrides
            .iter()
            .filter_map(|(aspect, severity)| parse_aspect(aspect).map(|a| (a, *severity)))
            .collect();
        SeverityConfig {
            minimum_severity: settings.minimum_severity,
            fail_on_severity: settings.fail_on_severity,
            suppress_warnings: settings.suppress_warnings,
            aspect_overrides,
        }
    }
}

fn parse_aspect(name: &str) -> Option<drift_compare::Aspect> {
    use drift_compare::Aspect::*;
    Some(match name {
        "schema" => Schema,
        "description" => Description,
        "tool_annotations" => ToolAnnotations,
        "output_schema" => OutputSchema,
        "execution_task_support" => ExecutionTaskSupport,
        "title" => Title,
        "response_structure" => ResponseStructure,
        "error_pattern" => ErrorPattern,
        "response_schema_evolution" => ResponseSchemaEvolution,
        "security" => Security,
        "server" => Server,
        "prompt" => Prompt,
        "resource" => Resource,
        "resource_template" => ResourceTemplate,
        "workflow" => Workflow,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_store_settings_match_baseline_default() {
        let settings = StoreSettings::default();
        assert_eq!(settings.max_size, MAX_BASELINE_SIZE);
        assert!(!settings.skip_integrity_check);
    }

    #[test]
    fn comparator_settings_round_trip_through_options() {
        let settings = ComparatorSettings::default();
        let options: ComparatorOptions = (&settings).into();
        assert_eq!(options.performance_threshold, 0.10);
    }

    #[test]
    fn unknown_aspect_override_is_ignored() {
        let mut settings = SeveritySettings::default();
        settings.aspect_overrides.insert("not_a_real_aspect".to_string(), Severity::Info);
        let config: SeverityConfig = (&settings).into();
        assert!(config.aspect_overrides.is_empty());
    }

    #[test]
    fn config_serializes_round_trip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.comparator.performance_threshold, config.comparator.performance_threshold);
    }
}
