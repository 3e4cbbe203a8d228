//! The baseline data model: an immutable recording of a server's
//! advertised contracts and observed runtime behavior at a point in time.

use chrono::{DateTime, Utc};
use drift_fingerprint::{
    DocumentationScore, ErrorPattern, PerformanceConfidence, ResponseFingerprint, ResponseSchemaEvolution,
};
use drift_hash::Hash16;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Four-valued severity classification, ordered `none < info < warning <
/// breaking`. Declaration order backs the derived [`Ord`] impl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    None,
    Info,
    Warning,
    Breaking,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::None => "none",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Breaking => "breaking",
        };
        f.write_str(s)
    }
}

/// Probe execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeMode {
    Check,
    Explore,
}

/// Baseline-level provenance: how and when this baseline was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub mode: ProbeMode,
    pub generated_at: DateTime<Utc>,
    pub cli_version: String,
    pub server_command: String,
    pub server_name: String,
    pub duration_ms: u64,
    pub personas: BTreeSet<String>,
    pub model: Option<String>,
}

/// Identity and advertised protocol surface of the probed server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub protocol_version: String,
    pub capabilities: BTreeSet<String>,
    pub instructions: Option<String>,
}

/// Per-tool behavioral annotations (protocol-gated, see `drift-compare`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolAnnotations {
    pub read_only_hint: Option<bool>,
    pub destructive_hint: Option<bool>,
    pub idempotent_hint: Option<bool>,
    pub open_world_hint: Option<bool>,
}

/// Whether a tool supports long-running task execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSupport {
    Optional,
    Required,
}

/// Execution characteristics gated on newer protocol versions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExecutionInfo {
    pub task_support: Option<TaskSupport>,
}

/// Severity of a single security test finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// One security probe result (e.g. an injection or privilege-escalation
/// check) observed against a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityFinding {
    pub category: String,
    pub risk_level: RiskLevel,
    pub title: String,
    pub description: String,
    pub evidence: String,
    pub remediation: String,
    pub cwe_id: Option<String>,
    pub parameter: Option<String>,
    pub tool: String,
}

/// Aggregate security-probe result for one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityFingerprint {
    pub tested: bool,
    pub categories_tested: BTreeSet<String>,
    pub findings: Vec<SecurityFinding>,
    pub risk_score: u8,
    pub tested_at: DateTime<Utc>,
    pub findings_hash: Hash16,
}

/// One tool's advertised contract and, once probed, its observed runtime
/// behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCapability {
    pub name: String,
    pub description: String,
    pub title: Option<String>,
    pub input_schema: serde_json::Value,
    pub schema_hash: Hash16,
    pub annotations: Option<ToolAnnotations>,
    pub output_schema: Option<serde_json::Value>,
    pub output_schema_hash: Option<Hash16>,
    pub execution: Option<ExecutionInfo>,
    pub response_fingerprint: Option<ResponseFingerprint>,
    pub inferred_output_schema: Option<serde_json::Value>,
    pub response_schema_evolution: Option<ResponseSchemaEvolution>,
    pub error_patterns: Option<Vec<ErrorPattern>>,
    pub baseline_p50_ms: Option<f64>,
    pub baseline_p95_ms: Option<f64>,
    pub baseline_p99_ms: Option<f64>,
    pub baseline_success_rate: Option<f64>,
    pub performance_confidence: Option<PerformanceConfidence>,
    pub security_fingerprint: Option<SecurityFingerprint>,
    pub last_tested_at: Option<DateTime<Utc>>,
    pub input_schema_hash_at_test: Option<Hash16>,
    /// Hash of the arguments actually issued during probing, used to
    /// detect drift between declared and observed usage.
    pub observed_args_schema_hash: Option<Hash16>,
}

/// Audience restriction metadata on a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceAnnotations {
    pub audience: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptArgument {
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptCapability {
    pub name: String,
    pub description: String,
    pub title: Option<String>,
    pub arguments: Vec<PromptArgument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCapability {
    pub uri: String,
    pub name: String,
    pub description: Option<String>,
    pub title: Option<String>,
    pub mime_type: Option<String>,
    pub annotations: Option<ResourceAnnotations>,
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTemplateCapability {
    pub uri_template: String,
    pub name: String,
    pub description: Option<String>,
    pub title: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    pub tools: Vec<ToolCapability>,
    pub prompts: Option<Vec<PromptCapability>>,
    pub resources: Option<Vec<ResourceCapability>>,
    pub resource_templates: Option<Vec<ResourceTemplateCapability>>,
}

/// Narrative, human-authored fields about a tool that aren't derived from
/// probing: what it's expected to do, and known caveats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolProfile {
    pub description: Option<String>,
    pub assertions: Vec<String>,
    pub limitations: Vec<String>,
    pub security_notes: Vec<String>,
    pub behavioral_notes: Vec<String>,
}

/// The fixed mapping from narrative-field polarity to assertion kind
/// (see `drift-baseline::builder`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssertionKind {
    Expects,
    Requires,
    Warns,
    Notes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    pub tool: String,
    pub kind: AssertionKind,
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    pub id: String,
    pub name: String,
    pub tool_sequence: Vec<String>,
    pub succeeded: bool,
    pub summary: String,
}

/// A caller-authored record declaring that an observed drift between two
/// baselines is intentional, stapled onto the newer baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acceptance {
    pub accepted_at: DateTime<Utc>,
    pub accepted_by: Option<String>,
    pub reason: Option<String>,
    pub accepted_diff: serde_json::Value,
}

/// The root document: an immutable snapshot of a server's contracts and
/// observed behavior at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub format_version: Version,
    pub metadata: Metadata,
    pub server: ServerInfo,
    pub capabilities: Capabilities,
    pub tool_profiles: BTreeMap<String, ToolProfile>,
    pub workflows: Option<Vec<WorkflowOutcome>>,
    pub assertions: Vec<Assertion>,
    pub documentation_score: Option<DocumentationScore>,
    pub acceptance: Option<Acceptance>,
    pub hash: Hash16,
}

impl Baseline {
    /// Looks up a tool by name. Tool names are unique within a baseline.
    pub fn tool(&self, name: &str) -> Option<&ToolCapability> {
        self.capabilities.tools.iter().find(|t| t.name == name)
    }

    pub fn has_acceptance(&self) -> bool {
        self.acceptance.is_some()
    }
}
