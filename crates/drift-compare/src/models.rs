//! Types describing a single comparison result: the behavioral diff
//! between two baselines, and the per-change records that make it up.

use drift_baseline::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The area of behavior a [`BehaviorChange`] was detected in. Mirrors the
/// aspect names used throughout the comparator contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    Schema,
    Description,
    ToolAnnotations,
    OutputSchema,
    ExecutionTaskSupport,
    Title,
    ResponseStructure,
    ErrorPattern,
    ResponseSchemaEvolution,
    Security,
    Server,
    Prompt,
    Resource,
    ResourceTemplate,
    Workflow,
}

impl std::fmt::Display for Aspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Aspect::Schema => "schema",
            Aspect::Description => "description",
            Aspect::ToolAnnotations => "tool_annotations",
            Aspect::OutputSchema => "output_schema",
            Aspect::ExecutionTaskSupport => "execution_task_support",
            Aspect::Title => "title",
            Aspect::ResponseStructure => "response_structure",
            Aspect::ErrorPattern => "error_pattern",
            Aspect::ResponseSchemaEvolution => "response_schema_evolution",
            Aspect::Security => "security",
            Aspect::Server => "server",
            Aspect::Prompt => "prompt",
            Aspect::Resource => "resource",
            Aspect::ResourceTemplate => "resource_template",
            Aspect::Workflow => "workflow",
        };
        f.write_str(s)
    }
}

/// One detected behavioral change, scoped to an entity (a tool, prompt,
/// resource, or the server itself) and an aspect of that entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorChange {
    /// Name of the tool/prompt/resource this change concerns, or `None`
    /// for server-level changes.
    pub entity: Option<String>,
    pub aspect: Aspect,
    pub severity: Severity,
    pub description: String,
}

impl BehaviorChange {
    /// The stable sort key used to order change lists: entity name, then
    /// aspect, then description.
    pub fn sort_key(&self) -> (String, String, String) {
        (self.entity.clone().unwrap_or_default(), self.aspect.to_string(), self.description.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionCompatibility {
    pub previous_version: String,
    pub current_version: String,
    pub compatible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRegressionReport {
    pub regressions: Vec<String>,
    pub improvements: usize,
    pub confidence_changes: Vec<String>,
    pub low_confidence_tools: Vec<String>,
    pub has_regressions: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityDiffReport {
    pub new_findings: usize,
    pub resolved_findings: usize,
    pub previous_risk_score: f64,
    pub current_risk_score: f64,
    pub degraded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaEvolutionReport {
    pub stable_count: usize,
    pub unstable_count: usize,
    pub structure_changed_count: usize,
    pub has_breaking_changes: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorTrendReport {
    pub new_categories: Vec<String>,
    pub resolved_categories: Vec<String>,
    pub increasing_categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationScoreReport {
    pub improved: bool,
    pub degraded: bool,
    pub previous_grade: String,
    pub current_grade: String,
}

/// The complete result of comparing two baselines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralDiff {
    pub version_compatibility: VersionCompatibility,
    pub tools_added: Vec<String>,
    pub tools_removed: Vec<String>,
    pub tools_modified: Vec<String>,
    pub behavior_changes: Vec<BehaviorChange>,
    pub performance_report: Option<PerformanceRegressionReport>,
    pub security_report: Option<SecurityDiffReport>,
    pub schema_evolution_report: Option<SchemaEvolutionReport>,
    pub error_trend_report: Option<ErrorTrendReport>,
    pub documentation_score_report: Option<DocumentationScoreReport>,
    pub severity: Severity,
    pub breaking_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub summary: String,
}

/// Options controlling what the comparator considers.
#[derive(Debug, Clone)]
pub struct ComparatorOptions {
    pub ignore_version_mismatch: bool,
    pub ignore_schema_changes: bool,
    pub ignore_description_changes: bool,
    pub ignore_response_structure_changes: bool,
    pub ignore_error_pattern_changes: bool,
    pub ignore_security_changes: bool,
    pub ignore_output_schema_changes: bool,
    /// Restricts the diff to these tool names when non-empty.
    pub tools: Vec<String>,
    /// Regression fraction (0..1) above which a performance change counts
    /// as a regression. Defaults to 0.10.
    pub performance_threshold: f64,
}

impl Default for ComparatorOptions {
    fn default() -> Self {
        Self {
            ignore_version_mismatch: false,
            ignore_schema_changes: false,
            ignore_description_changes: false,
            ignore_response_structure_changes: false,
            ignore_error_pattern_changes: false,
            ignore_security_changes: false,
            ignore_output_schema_changes: false,
            tools: Vec::new(),
            performance_threshold: 0.10,
        }
    }
}

impl ComparatorOptions {
    pub fn tool_allowed(&self, name: &str) -> bool {
        self.tools.is_empty() || self.tools.iter().any(|t| t == name)
    }
}

/// Policy applied after a diff has been computed, per §4.11.
#[derive(Debug, Clone, Default)]
pub struct SeverityConfig {
    pub minimum_severity: Option<Severity>,
    pub fail_on_severity: Option<Severity>,
    pub suppress_warnings: bool,
    pub aspect_overrides: BTreeMap<Aspect, Severity>,
}
