//! Assembles an immutable [`Baseline`] from discovery metadata and
//! per-tool probe output.

use crate::error::BaselineError;
use crate::hashing::recalculate_baseline_hash;
use crate::models::*;
use drift_fingerprint::{
    extract_error_patterns, infer_schema, score_documentation, update_evolution, LatencySample, PerformanceStats,
    ResponseSample, SchemaHistoryEntry, ToolDocInput, ToolDocumentationReport,
};
use std::collections::BTreeMap;

/// A tool's advertised contract as returned by discovery, before any
/// probing has taken place.
#[derive(Debug, Clone)]
pub struct DeclaredTool {
    pub name: String,
    pub description: String,
    pub title: Option<String>,
    pub input_schema: serde_json::Value,
    pub annotations: Option<ToolAnnotations>,
    pub output_schema: Option<serde_json::Value>,
    pub execution: Option<ExecutionInfo>,
}

/// Everything observed while probing a single tool.
#[derive(Debug, Clone, Default)]
pub struct ToolProbeOutput {
    pub response_samples: Vec<ResponseSample>,
    pub latency_samples: Vec<LatencySample>,
    pub observed_args: Vec<serde_json::Value>,
    pub security_fingerprint: Option<SecurityFingerprint>,
    pub previous_schema_history: Vec<SchemaHistoryEntry>,
}

/// Everything the builder needs to assemble a baseline.
#[derive(Debug, Clone)]
pub struct BuildInput {
    pub server: ServerInfo,
    pub metadata: Metadata,
    pub declared_tools: Vec<DeclaredTool>,
    pub probes: BTreeMap<String, ToolProbeOutput>,
    pub tool_profiles: BTreeMap<String, ToolProfile>,
    pub prompts: Option<Vec<PromptCapability>>,
    pub resources: Option<Vec<ResourceCapability>>,
    pub resource_templates: Option<Vec<ResourceTemplateCapability>>,
    pub workflows: Option<Vec<WorkflowOutcome>>,
    pub doc_inputs: Vec<ToolDocInput>,
}

/// The assembled baseline plus the per-tool documentation detail the
/// scorer produced but which isn't persisted on the baseline itself.
pub struct BuildResult {
    pub baseline: Baseline,
    pub documentation_reports: Vec<ToolDocumentationReport>,
}

fn is_negative(text: &str) -> bool {
    let t = text.to_lowercase();
    ["vulnerable", "risk", "warn", "unsafe", "insecure", "caution", "danger", "exploit", "should not", "must not"]
        .iter()
        .any(|k| t.contains(k))
}

fn is_security_related(text: &str) -> bool {
    let t = text.to_lowercase();
    ["security", "auth", "inject", "privilege", "credential", "secret", "vulnerab", "exploit", "sanitiz"]
        .iter()
        .any(|k| t.contains(k))
}

fn assertion_kind(text: &str, from_security_source: bool) -> AssertionKind {
    let negative = is_negative(text);
    let security = from_security_source || is_security_related(text);
    match (security, negative) {
        (false, false) => AssertionKind::Expects,
        (true, false) => AssertionKind::Requires,
        (true, true) => AssertionKind::Warns,
        (false, true) => AssertionKind::Notes,
    }
}

fn assertion_severity(text: &str) -> Severity {
    let t = text.to_lowercase();
    if t.contains("critical") || t.contains("must not") || t.contains("never") {
        Severity::Breaking
    } else if t.contains("must") || t.contains("required") || t.contains("warning") || t.contains("risk") {
        Severity::Warning
    } else {
        Severity::Info
    }
}

fn derive_assertions(tool: &str, profile: &ToolProfile) -> Vec<Assertion> {
    let mut out = Vec::new();
    let mut push_all = |texts: &[String], from_security: bool| {
        for text in texts {
            out.push(Assertion {
                tool: tool.to_string(),
                kind: assertion_kind(text, from_security),
                text: text.clone(),
                severity: assertion_severity(text),
            });
        }
    };
    push_all(&profile.assertions, false);
    push_all(&profile.limitations, false);
    push_all(&profile.security_notes, true);
    push_all(&profile.behavioral_notes, false);
    out
}

fn inconsistent_fields(samples: &[ResponseSample]) -> Vec<String> {
    let objects: Vec<&serde_json::Value> = samples
        .iter()
        .filter(|s| s.is_success())
        .filter_map(|s| match &s.content {
            Some(drift_fingerprint::ResponseContent::Json(v @ serde_json::Value::Object(_))) => Some(v),
            _ => None,
        })
        .collect();
    if objects.is_empty() {
        return Vec::new();
    }
    let total = objects.len();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for obj in &objects {
        if let serde_json::Value::Object(map) = obj {
            for key in map.keys() {
                *counts.entry(key.clone()).or_insert(0) += 1;
            }
        }
    }
    let mut inconsistent: Vec<String> =
        counts.into_iter().filter(|(_, count)| *count != total).map(|(k, _)| k).collect();
    inconsistent.sort();
    inconsistent
}

fn build_tool(
    declared: &DeclaredTool,
    probe: Option<&ToolProbeOutput>,
    generated_at: chrono::DateTime<chrono::Utc>,
) -> Result<ToolCapability, BaselineError> {
    let schema_hash = drift_hash::hash(&declared.input_schema)?;
    let output_schema_hash =
        declared.output_schema.as_ref().map(drift_hash::hash).transpose()?;

    let mut capability = ToolCapability {
        name: declared.name.clone(),
        description: declared.description.clone(),
        title: declared.title.clone(),
        input_schema: declared.input_schema.clone(),
        schema_hash,
        annotations: declared.annotations,
        output_schema: declared.output_schema.clone(),
        output_schema_hash,
        execution: declared.execution,
        response_fingerprint: None,
        inferred_output_schema: None,
        response_schema_evolution: None,
        error_patterns: None,
        baseline_p50_ms: None,
        baseline_p95_ms: None,
        baseline_p99_ms: None,
        baseline_success_rate: None,
        performance_confidence: None,
        security_fingerprint: None,
        last_tested_at: None,
        input_schema_hash_at_test: None,
        observed_args_schema_hash: None,
    };

    let Some(probe) = probe else {
        return Ok(capability);
    };

    if !probe.observed_args.is_empty() {
        let inferred = infer_schema(&probe.observed_args);
        capability.observed_args_schema_hash = Some(drift_hash::hash(&inferred)?);
    }

    if !probe.response_samples.is_empty() {
        let result = drift_fingerprint::compute_fingerprint(&probe.response_samples)?;
        capability.response_fingerprint = Some(result.fingerprint.clone());
        capability.inferred_output_schema = result.inferred_schema.clone();
        capability.error_patterns = Some(extract_error_patterns(&probe.response_samples)?);

        if let Some(schema) = result.inferred_schema {
            let fields = inconsistent_fields(&probe.response_samples);
            let evolution = update_evolution(
                probe.previous_schema_history.clone(),
                schema,
                generated_at,
                result.fingerprint.sample_count,
                fields,
            )?;
            capability.response_schema_evolution = Some(evolution);
        }
    }

    if !probe.latency_samples.is_empty() {
        let stats: PerformanceStats = drift_fingerprint::compute_performance(&probe.latency_samples);
        capability.baseline_p50_ms = Some(stats.p50_ms);
        capability.baseline_p95_ms = Some(stats.p95_ms);
        capability.baseline_p99_ms = Some(stats.p99_ms);
        capability.baseline_success_rate = Some(stats.success_rate);
        capability.performance_confidence = Some(stats.confidence);
    }

    capability.security_fingerprint = probe.security_fingerprint.clone();
    capability.last_tested_at = Some(generated_at);
    capability.input_schema_hash_at_test = Some(capability.schema_hash.clone());

    Ok(capability)
}

/// Assembles a complete, hashed [`Baseline`] from discovery output and
/// per-tool probe results. Tools are processed and emitted sorted
/// lexicographically by name, so identical probe output always produces
/// a byte-identical baseline regardless of probing order.
pub fn build_baseline(input: BuildInput) -> Result<BuildResult, BaselineError> {
    let mut declared_sorted = input.declared_tools;
    declared_sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut tools = Vec::with_capacity(declared_sorted.len());
    for declared in &declared_sorted {
        let probe = input.probes.get(&declared.name);
        tools.push(build_tool(declared, probe, input.metadata.generated_at)?);
    }

    let (documentation_score, documentation_reports) = score_documentation(&input.doc_inputs);

    let mut assertions = Vec::new();
    for (tool, profile) in &input.tool_profiles {
        assertions.extend(derive_assertions(tool, profile));
    }
    assertions.sort_by(|a, b| a.tool.cmp(&b.tool).then_with(|| a.text.cmp(&b.text)));

    let placeholder_hash = drift_hash::Hash16::try_from("0000000000000000").expect("valid placeholder hash");

    let baseline = Baseline {
        format_version: input.metadata_format_version(),
        metadata: input.metadata,
        server: input.server,
        capabilities: Capabilities {
            tools,
            prompts: input.prompts,
            resources: input.resources,
            resource_templates: input.resource_templates,
        },
        tool_profiles: input.tool_profiles,
        workflows: input.workflows,
        assertions,
        documentation_score: Some(documentation_score),
        acceptance: None,
        hash: placeholder_hash,
    };

    let baseline = recalculate_baseline_hash(baseline)?;
    Ok(BuildResult { baseline, documentation_reports })
}

impl BuildInput {
    fn metadata_format_version(&self) -> semver::Version {
        semver::Version::new(1, 0, 0)
    }
}
