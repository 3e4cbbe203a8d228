//! The comparator core: `compare_baselines` and the per-aspect,
//! per-entity comparison functions it composes.

use crate::aggregate::{
    build_documentation_score_report, build_error_trend_report, build_performance_report,
    build_schema_evolution_report, build_security_report, risk_level_rank,
};
use crate::error::CompareError;
use crate::gating::{is_gated_out, GATE_ANNOTATIONS, GATE_OUTPUT_SCHEMA, GATE_TASK_SUPPORT};
use crate::models::{Aspect, BehavioralDiff, BehaviorChange, ComparatorOptions, VersionCompatibility};
use drift_baseline::{
    Baseline, PromptCapability, ResourceCapability, ResourceTemplateCapability, Severity, TaskSupport,
    ToolAnnotations, ToolCapability, WorkflowOutcome,
};
use drift_schema::compare_schemas;
use std::collections::BTreeSet;

fn change(entity: Option<&str>, aspect: Aspect, severity: Severity, description: impl Into<String>) -> BehaviorChange {
    BehaviorChange { entity: entity.map(str::to_string), aspect, severity, description: description.into() }
}

fn schema_changes_to_behavior(
    entity: &str,
    aspect: Aspect,
    prev_schema: &serde_json::Value,
    curr_schema: &serde_json::Value,
    hashes_differ: bool,
) -> Vec<BehaviorChange> {
    let diffs = compare_schemas(prev_schema, curr_schema);
    if diffs.is_empty() && hashes_differ {
        return vec![change(
            Some(entity),
            aspect,
            Severity::Breaking,
            format!("{entity}: schema hash changed but no structural difference could be detailed"),
        )];
    }
    diffs
        .into_iter()
        .map(|d| {
            let severity = if d.breaking { Severity::Breaking } else { Severity::Warning };
            change(Some(entity), aspect, severity, format!("{entity}: {}", d.description))
        })
        .collect()
}

fn compare_tool_schema(prev: &ToolCapability, curr: &ToolCapability, options: &ComparatorOptions) -> Vec<BehaviorChange> {
    if options.ignore_schema_changes || prev.schema_hash == curr.schema_hash {
        return Vec::new();
    }
    schema_changes_to_behavior(&curr.name, Aspect::Schema, &prev.input_schema, &curr.input_schema, true)
}

fn compare_tool_description(prev: &ToolCapability, curr: &ToolCapability, options: &ComparatorOptions) -> Vec<BehaviorChange> {
    if options.ignore_description_changes || prev.description == curr.description {
        return Vec::new();
    }
    vec![change(Some(&curr.name), Aspect::Description, Severity::Info, format!("{}: description changed", curr.name))]
}

fn compare_tool_annotations(
    prev: &ToolCapability,
    curr: &ToolCapability,
    prev_protocol: &str,
    curr_protocol: &str,
) -> Vec<BehaviorChange> {
    if is_gated_out(prev_protocol, curr_protocol, GATE_ANNOTATIONS) {
        return Vec::new();
    }
    let prev_ann = prev.annotations.unwrap_or_default();
    let curr_ann = curr.annotations.unwrap_or_default();
    let mut out = Vec::new();
    let name = &curr.name;

    if prev_ann.read_only_hint != curr_ann.read_only_hint {
        let severity = if prev_ann.read_only_hint == Some(true) && curr_ann.read_only_hint == Some(false) {
            Severity::Breaking
        } else {
            Severity::Warning
        };
        out.push(change(Some(name), Aspect::ToolAnnotations, severity, format!("{name}: readOnlyHint changed")));
    }

    if prev_ann.destructive_hint != curr_ann.destructive_hint {
        let severity = if curr_ann.destructive_hint == Some(true) && prev_ann.destructive_hint != Some(true) {
            Severity::Breaking
        } else {
            Severity::Warning
        };
        out.push(change(Some(name), Aspect::ToolAnnotations, severity, format!("{name}: destructiveHint changed")));
    }

    if prev_ann.idempotent_hint != curr_ann.idempotent_hint {
        out.push(change(
            Some(name),
            Aspect::ToolAnnotations,
            Severity::Warning,
            format!("{name}: idempotentHint changed"),
        ));
    }

    if prev_ann.open_world_hint != curr_ann.open_world_hint {
        out.push(change(Some(name), Aspect::ToolAnnotations, Severity::Info, format!("{name}: openWorldHint changed")));
    }

    out
}

fn compare_output_schema(
    prev: &ToolCapability,
    curr: &ToolCapability,
    options: &ComparatorOptions,
    prev_protocol: &str,
    curr_protocol: &str,
) -> Vec<BehaviorChange> {
    if options.ignore_output_schema_changes || is_gated_out(prev_protocol, curr_protocol, GATE_OUTPUT_SCHEMA) {
        return Vec::new();
    }
    let name = &curr.name;
    match (&prev.output_schema, &curr.output_schema) {
        (None, None) => Vec::new(),
        (None, Some(_)) => vec![change(Some(name), Aspect::OutputSchema, Severity::Warning, format!("{name}: outputSchema added"))],
        (Some(_), None) => vec![change(Some(name), Aspect::OutputSchema, Severity::Warning, format!("{name}: outputSchema removed"))],
        (Some(prev_schema), Some(curr_schema)) => {
            if prev.output_schema_hash == curr.output_schema_hash {
                return Vec::new();
            }
            schema_changes_to_behavior(name, Aspect::OutputSchema, prev_schema, curr_schema, true)
        }
    }
}

fn compare_execution(
    prev: &ToolCapability,
    curr: &ToolCapability,
    prev_protocol: &str,
    curr_protocol: &str,
) -> Vec<BehaviorChange> {
    if is_gated_out(prev_protocol, curr_protocol, GATE_TASK_SUPPORT) {
        return Vec::new();
    }
    let prev_support = prev.execution.and_then(|e| e.task_support);
    let curr_support = curr.execution.and_then(|e| e.task_support);
    if prev_support == curr_support {
        return Vec::new();
    }
    let name = &curr.name;
    let severity = match (prev_support, curr_support) {
        (Some(TaskSupport::Optional), Some(TaskSupport::Required)) => Severity::Warning,
        (Some(TaskSupport::Required), Some(TaskSupport::Optional)) => Severity::Info,
        (None, Some(TaskSupport::Required)) => Severity::Warning,
        _ => Severity::Info,
    };
    vec![change(Some(name), Aspect::ExecutionTaskSupport, severity, format!("{name}: execution.taskSupport changed"))]
}

fn compare_title(prev_title: &Option<String>, curr_title: &Option<String>, entity: &str, prev_protocol: &str, curr_protocol: &str) -> Vec<BehaviorChange> {
    if is_gated_out(prev_protocol, curr_protocol, GATE_ANNOTATIONS) || prev_title == curr_title {
        return Vec::new();
    }
    vec![change(Some(entity), Aspect::Title, Severity::Info, format!("{entity}: title changed"))]
}

fn compare_response_structure(prev: &ToolCapability, curr: &ToolCapability, options: &ComparatorOptions) -> Vec<BehaviorChange> {
    if options.ignore_response_structure_changes {
        return Vec::new();
    }
    let (Some(prev_fp), Some(curr_fp)) = (&prev.response_fingerprint, &curr.response_fingerprint) else {
        return Vec::new();
    };
    let name = &curr.name;
    let mut out = Vec::new();

    if prev_fp.structure_hash != curr_fp.structure_hash {
        out.push(change(Some(name), Aspect::ResponseStructure, Severity::Breaking, format!("{name}: response structure hash changed")));
    }
    if prev_fp.content_type != curr_fp.content_type {
        out.push(change(Some(name), Aspect::ResponseStructure, Severity::Breaking, format!("{name}: response content type changed")));
    }

    let prev_fields: BTreeSet<&String> = prev_fp.fields.as_ref().map(|f| f.iter().collect()).unwrap_or_default();
    let curr_fields: BTreeSet<&String> = curr_fp.fields.as_ref().map(|f| f.iter().collect()).unwrap_or_default();
    for removed in prev_fields.difference(&curr_fields) {
        out.push(change(Some(name), Aspect::ResponseStructure, Severity::Breaking, format!("{name}: response field '{removed}' removed")));
    }
    for added in curr_fields.difference(&prev_fields) {
        out.push(change(Some(name), Aspect::ResponseStructure, Severity::Warning, format!("{name}: response field '{added}' added")));
    }

    if !prev_fp.is_empty && curr_fp.is_empty {
        out.push(change(Some(name), Aspect::ResponseStructure, Severity::Breaking, format!("{name}: responses became empty")));
    } else if prev_fp.is_empty && !curr_fp.is_empty {
        out.push(change(Some(name), Aspect::ResponseStructure, Severity::Info, format!("{name}: responses are no longer empty")));
    }

    if let (Some(prev_items), Some(curr_items)) = (&prev_fp.array_item_structure, &curr_fp.array_item_structure) {
        if prev_items != curr_items {
            out.push(change(Some(name), Aspect::ResponseStructure, Severity::Breaking, format!("{name}: array item structure changed")));
        }
    }

    if prev_fp.size != curr_fp.size {
        out.push(change(Some(name), Aspect::ResponseStructure, Severity::Info, format!("{name}: response size bucket changed")));
    }

    out
}

fn compare_error_patterns(prev: &ToolCapability, curr: &ToolCapability, options: &ComparatorOptions) -> Vec<BehaviorChange> {
    if options.ignore_error_pattern_changes {
        return Vec::new();
    }
    let prev_patterns = prev.error_patterns.as_deref().unwrap_or(&[]);
    let curr_patterns = curr.error_patterns.as_deref().unwrap_or(&[]);
    let name = &curr.name;
    let mut out = Vec::new();

    let prev_hashes: BTreeSet<&str> = prev_patterns.iter().map(|p| p.pattern_hash.as_str()).collect();
    let curr_hashes: BTreeSet<&str> = curr_patterns.iter().map(|p| p.pattern_hash.as_str()).collect();

    for pattern in curr_patterns {
        if !prev_hashes.contains(pattern.pattern_hash.as_str()) {
            out.push(change(
                Some(name),
                Aspect::ErrorPattern,
                Severity::Warning,
                format!("{name}: new error pattern observed ({:?}): {}", pattern.category, pattern.example),
            ));
        }
    }
    for pattern in prev_patterns {
        if !curr_hashes.contains(pattern.pattern_hash.as_str()) {
            out.push(change(
                Some(name),
                Aspect::ErrorPattern,
                Severity::Info,
                format!("{name}: error pattern no longer observed ({:?}): {}", pattern.category, pattern.example),
            ));
        }
    }

    out
}

fn compare_response_schema_evolution(prev: &ToolCapability, curr: &ToolCapability, options: &ComparatorOptions) -> Vec<BehaviorChange> {
    if options.ignore_response_structure_changes {
        return Vec::new();
    }
    let name = &curr.name;
    let mut out = Vec::new();

    if let (Some(prev_schema), Some(curr_schema)) = (&prev.inferred_output_schema, &curr.inferred_output_schema) {
        for d in compare_schemas(prev_schema, curr_schema) {
            use drift_schema::ChangeKind;
            let severity = match d.kind {
                ChangeKind::PropertyRemoved | ChangeKind::RequiredAdded => Severity::Breaking,
                ChangeKind::PropertyAdded => Severity::Info,
                ChangeKind::TypeChanged if d.before.as_deref() == Some("integer") && d.after.as_deref() == Some("number") => {
                    Severity::Warning
                }
                ChangeKind::TypeChanged => Severity::Breaking,
                _ => {
                    if d.breaking {
                        Severity::Breaking
                    } else {
                        Severity::Info
                    }
                }
            };
            out.push(change(Some(name), Aspect::ResponseSchemaEvolution, severity, format!("{name}: inferred response schema {}", d.description)));
        }
    }

    if let (Some(prev_evo), Some(curr_evo)) = (&prev.response_schema_evolution, &curr.response_schema_evolution) {
        if prev_evo.is_stable && !curr_evo.is_stable {
            out.push(change(Some(name), Aspect::ResponseSchemaEvolution, Severity::Warning, format!("{name}: response schema became unstable")));
        }
    }

    out
}

fn compare_tool_security(prev: &ToolCapability, curr: &ToolCapability, options: &ComparatorOptions) -> Vec<BehaviorChange> {
    if options.ignore_security_changes {
        return Vec::new();
    }
    let name = &curr.name;
    let mut out = Vec::new();

    let empty = Vec::new();
    let prev_findings = prev.security_fingerprint.as_ref().map(|f| &f.findings).unwrap_or(&empty);
    let curr_findings = curr.security_fingerprint.as_ref().map(|f| &f.findings).unwrap_or(&empty);

    let key_of = |f: &drift_baseline::SecurityFinding| -> (String, String, Option<String>, Option<String>) {
        (f.tool.clone(), f.category.clone(), f.cwe_id.clone(), f.parameter.clone())
    };

    let prev_keys: BTreeSet<_> = prev_findings.iter().map(key_of).collect();
    let curr_keys: BTreeSet<_> = curr_findings.iter().map(key_of).collect();

    for finding in curr_findings {
        if !prev_keys.contains(&key_of(finding)) {
            let severity = match risk_level_rank(finding.risk_level) {
                r if r >= risk_level_rank(drift_baseline::RiskLevel::High) => Severity::Breaking,
                r if r >= risk_level_rank(drift_baseline::RiskLevel::Medium) => Severity::Warning,
                _ => Severity::Info,
            };
            out.push(change(Some(name), Aspect::Security, severity, format!("{name}: new security finding — {}", finding.title)));
        }
    }
    for finding in prev_findings {
        if !curr_keys.contains(&key_of(finding)) {
            out.push(change(Some(name), Aspect::Security, Severity::Info, format!("{name}: security finding resolved — {}", finding.title)));
        }
    }

    out
}

fn compare_tool(
    prev: &ToolCapability,
    curr: &ToolCapability,
    options: &ComparatorOptions,
    prev_protocol: &str,
    curr_protocol: &str,
) -> Vec<BehaviorChange> {
    let mut changes = Vec::new();
    changes.extend(compare_tool_schema(prev, curr, options));
    changes.extend(compare_tool_description(prev, curr, options));
    changes.extend(compare_tool_annotations(prev, curr, prev_protocol, curr_protocol));
    changes.extend(compare_output_schema(prev, curr, options, prev_protocol, curr_protocol));
    changes.extend(compare_execution(prev, curr, prev_protocol, curr_protocol));
    changes.extend(compare_title(&prev.title, &curr.title, &curr.name, prev_protocol, curr_protocol));
    changes.extend(compare_response_structure(prev, curr, options));
    changes.extend(compare_error_patterns(prev, curr, options));
    changes.extend(compare_response_schema_evolution(prev, curr, options));
    changes.extend(compare_tool_security(prev, curr, options));
    changes
}

fn compare_server(previous: &Baseline, current: &Baseline) -> Vec<BehaviorChange> {
    let prev = &previous.server;
    let curr = &current.server;
    let mut out = Vec::new();

    if prev.name != curr.name {
        out.push(change(None, Aspect::Server, Severity::Info, "server name changed"));
    }
    if prev.version != curr.version {
        out.push(change(None, Aspect::Server, Severity::Info, "server version changed"));
    }
    if prev.protocol_version != curr.protocol_version {
        let removed_capability = prev.capabilities.iter().any(|c| !curr.capabilities.contains(c));
        let severity = if removed_capability { Severity::Breaking } else { Severity::Warning };
        out.push(change(None, Aspect::Server, severity, "server protocolVersion changed"));
    }
    if !is_gated_out(&prev.protocol_version, &curr.protocol_version, GATE_OUTPUT_SCHEMA) && prev.instructions != curr.instructions {
        out.push(change(None, Aspect::Server, Severity::Info, "server instructions changed"));
    }
    for added in curr.capabilities.difference(&prev.capabilities) {
        out.push(change(None, Aspect::Server, Severity::Info, format!("server capability '{added}' added")));
    }
    for removed in prev.capabilities.difference(&curr.capabilities) {
        out.push(change(None, Aspect::Server, Severity::Breaking, format!("server capability '{removed}' removed")));
    }

    out
}

fn compare_prompts(previous: &Baseline, current: &Baseline, prev_protocol: &str, curr_protocol: &str) -> Vec<BehaviorChange> {
    let empty: Vec<PromptCapability> = Vec::new();
    let prev_prompts = previous.capabilities.prompts.as_ref().unwrap_or(&empty);
    let curr_prompts = current.capabilities.prompts.as_ref().unwrap_or(&empty);
    let mut out = Vec::new();

    for prompt in curr_prompts {
        if !prev_prompts.iter().any(|p| p.name == prompt.name) {
            out.push(change(Some(&prompt.name), Aspect::Prompt, Severity::Info, format!("prompt '{}' added", prompt.name)));
        }
    }
    for prompt in prev_prompts {
        if !curr_prompts.iter().any(|p| p.name == prompt.name) {
            out.push(change(Some(&prompt.name), Aspect::Prompt, Severity::Breaking, format!("prompt '{}' removed", prompt.name)));
        }
    }

    for prev_prompt in prev_prompts {
        let Some(curr_prompt) = curr_prompts.iter().find(|p| p.name == prev_prompt.name) else { continue };
        let name = &curr_prompt.name;

        for curr_arg in &curr_prompt.arguments {
            let Some(prev_arg) = prev_prompt.arguments.iter().find(|a| a.name == curr_arg.name) else {
                let severity = if curr_arg.required { Severity::Breaking } else { Severity::Info };
                out.push(change(Some(name), Aspect::Prompt, severity, format!("prompt '{name}': argument '{}' added", curr_arg.name)));
                continue;
            };
            if prev_arg.required != curr_arg.required {
                out.push(change(Some(name), Aspect::Prompt, Severity::Warning, format!("prompt '{name}': argument '{}' required-ness changed", curr_arg.name)));
            }
            if prev_arg.description != curr_arg.description {
                out.push(change(Some(name), Aspect::Prompt, Severity::Info, format!("prompt '{name}': argument '{}' description changed", curr_arg.name)));
            }
        }
        for prev_arg in &prev_prompt.arguments {
            if !curr_prompt.arguments.iter().any(|a| a.name == prev_arg.name) {
                out.push(change(Some(name), Aspect::Prompt, Severity::Breaking, format!("prompt '{name}': argument '{}' removed", prev_arg.name)));
            }
        }

        if prev_prompt.description != curr_prompt.description {
            out.push(change(Some(name), Aspect::Prompt, Severity::Info, format!("prompt '{name}': description changed")));
        }
        out.extend(compare_title(&prev_prompt.title, &curr_prompt.title, name, prev_protocol, curr_protocol));
    }

    out
}

fn compare_resources(previous: &Baseline, current: &Baseline, prev_protocol: &str, curr_protocol: &str) -> Vec<BehaviorChange> {
    let empty: Vec<ResourceCapability> = Vec::new();
    let prev_resources = previous.capabilities.resources.as_ref().unwrap_or(&empty);
    let curr_resources = current.capabilities.resources.as_ref().unwrap_or(&empty);
    let mut out = Vec::new();

    for resource in curr_resources {
        if !prev_resources.iter().any(|r| r.uri == resource.uri) {
            out.push(change(Some(&resource.uri), Aspect::Resource, Severity::Info, format!("resource '{}' added", resource.uri)));
        }
    }
    for resource in prev_resources {
        if !curr_resources.iter().any(|r| r.uri == resource.uri) {
            out.push(change(Some(&resource.uri), Aspect::Resource, Severity::Breaking, format!("resource '{}' removed", resource.uri)));
        }
    }

    for prev_resource in prev_resources {
        let Some(curr_resource) = curr_resources.iter().find(|r| r.uri == prev_resource.uri) else { continue };
        let name = &curr_resource.uri;

        if prev_resource.description != curr_resource.description || prev_resource.name != curr_resource.name {
            out.push(change(Some(name), Aspect::Resource, Severity::Info, format!("resource '{name}': description or name changed")));
        }
        out.extend(compare_title(&prev_resource.title, &curr_resource.title, name, prev_protocol, curr_protocol));

        if prev_resource.mime_type != curr_resource.mime_type {
            out.push(change(Some(name), Aspect::Resource, Severity::Warning, format!("resource '{name}': mimeType changed")));
        }

        let gated_annotations = is_gated_out(prev_protocol, curr_protocol, GATE_ANNOTATIONS);
        if !gated_annotations {
            let prev_audience = prev_resource.annotations.as_ref().and_then(|a| a.audience.clone());
            let curr_audience = curr_resource.annotations.as_ref().and_then(|a| a.audience.clone());
            if prev_audience != curr_audience {
                out.push(change(Some(name), Aspect::Resource, Severity::Warning, format!("resource '{name}': annotations.audience changed")));
            }
            if prev_resource.size != curr_resource.size {
                out.push(change(Some(name), Aspect::Resource, Severity::Info, format!("resource '{name}': size changed")));
            }
        }
    }

    out
}

fn compare_resource_templates(previous: &Baseline, current: &Baseline, prev_protocol: &str, curr_protocol: &str) -> Vec<BehaviorChange> {
    let empty: Vec<ResourceTemplateCapability> = Vec::new();
    let prev_templates = previous.capabilities.resource_templates.as_ref().unwrap_or(&empty);
    let curr_templates = current.capabilities.resource_templates.as_ref().unwrap_or(&empty);
    let mut out = Vec::new();

    for template in curr_templates {
        if !prev_templates.iter().any(|t| t.uri_template == template.uri_template) {
            out.push(change(Some(&template.uri_template), Aspect::ResourceTemplate, Severity::Info, format!("resource template '{}' added", template.uri_template)));
        }
    }
    for template in prev_templates {
        if !curr_templates.iter().any(|t| t.uri_template == template.uri_template) {
            out.push(change(Some(&template.uri_template), Aspect::ResourceTemplate, Severity::Breaking, format!("resource template '{}' removed", template.uri_template)));
        }
    }

    for prev_template in prev_templates {
        let Some(curr_template) = curr_templates.iter().find(|t| t.uri_template == prev_template.uri_template) else { continue };
        let name = &curr_template.uri_template;

        if prev_template.description != curr_template.description || prev_template.mime_type != curr_template.mime_type {
            out.push(change(Some(name), Aspect::ResourceTemplate, Severity::Info, format!("resource template '{name}': description or mimeType changed")));
        }
        out.extend(compare_title(&prev_template.title, &curr_template.title, name, prev_protocol, curr_protocol));
    }

    out
}

fn compare_workflows(previous: &Baseline, current: &Baseline) -> Vec<BehaviorChange> {
    let empty: Vec<WorkflowOutcome> = Vec::new();
    let prev_workflows = previous.workflows.as_ref().unwrap_or(&empty);
    let curr_workflows = current.workflows.as_ref().unwrap_or(&empty);
    let mut out = Vec::new();

    for prev_workflow in prev_workflows {
        let Some(curr_workflow) = curr_workflows.iter().find(|w| w.id == prev_workflow.id) else { continue };
        if prev_workflow.succeeded && !curr_workflow.succeeded {
            out.push(change(Some(&curr_workflow.id), Aspect::Workflow, Severity::Breaking, format!("workflow '{}' now fails", curr_workflow.id)));
        } else if !prev_workflow.succeeded && curr_workflow.succeeded {
            out.push(change(Some(&curr_workflow.id), Aspect::Workflow, Severity::Info, format!("workflow '{}' now succeeds", curr_workflow.id)));
        }
    }

    out
}

fn major_version(version: &semver::Version) -> u64 {
    version.major
}

/// Compares two baselines and produces a deterministic, severity-classified
/// diff. The only error this can return is [`CompareError::VersionIncompatible`].
pub fn compare_baselines(
    previous: &Baseline,
    current: &Baseline,
    options: &ComparatorOptions,
) -> Result<BehavioralDiff, CompareError> {
    let compatible = major_version(&previous.format_version) == major_version(&current.format_version);
    if !compatible && !options.ignore_version_mismatch {
        return Err(CompareError::VersionIncompatible {
            source_version: previous.format_version.to_string(),
            target_version: current.format_version.to_string(),
        });
    }
    let version_compatibility = VersionCompatibility {
        previous_version: previous.format_version.to_string(),
        current_version: current.format_version.to_string(),
        compatible,
    };

    let prev_protocol = previous.server.protocol_version.as_str();
    let curr_protocol = current.server.protocol_version.as_str();

    let prev_names: BTreeSet<&str> = previous.capabilities.tools.iter().map(|t| t.name.as_str()).collect();
    let curr_names: BTreeSet<&str> = current.capabilities.tools.iter().map(|t| t.name.as_str()).collect();

    let mut tools_removed: Vec<String> =
        prev_names.difference(&curr_names).filter(|n| options.tool_allowed(n)).map(|n| n.to_string()).collect();
    let mut tools_added: Vec<String> =
        curr_names.difference(&prev_names).filter(|n| options.tool_allowed(n)).map(|n| n.to_string()).collect();
    tools_removed.sort();
    tools_added.sort();

    let mut behavior_changes = Vec::new();
    let mut tools_modified = Vec::new();

    for name in prev_names.intersection(&curr_names) {
        if !options.tool_allowed(name) {
            continue;
        }
        let prev_tool = previous.tool(name).expect("name came from previous.capabilities.tools");
        let curr_tool = current.tool(name).expect("name came from current.capabilities.tools");
        let changes = compare_tool(prev_tool, curr_tool, options, prev_protocol, curr_protocol);
        if !changes.is_empty() {
            tools_modified.push(name.to_string());
        }
        behavior_changes.extend(changes);
    }
    tools_modified.sort();

    behavior_changes.extend(compare_server(previous, current));
    behavior_changes.extend(compare_prompts(previous, current, prev_protocol, curr_protocol));
    behavior_changes.extend(compare_resources(previous, current, prev_protocol, curr_protocol));
    behavior_changes.extend(compare_resource_templates(previous, current, prev_protocol, curr_protocol));
    behavior_changes.extend(compare_workflows(previous, current));

    behavior_changes.sort_by_key(|c| c.sort_key());

    let breaking_count = tools_removed.len() + behavior_changes.iter().filter(|c| c.severity == Severity::Breaking).count();
    let warning_count = behavior_changes.iter().filter(|c| c.severity == Severity::Warning).count();
    let info_count = tools_added.len() + behavior_changes.iter().filter(|c| c.severity == Severity::Info).count();

    let severity = if breaking_count > 0 {
        Severity::Breaking
    } else if warning_count > 0 {
        Severity::Warning
    } else if info_count > 0 {
        Severity::Info
    } else {
        Severity::None
    };

    let summary = format!(
        "{} tool(s) removed, {} added, {} modified; {} breaking, {} warning, {} info change(s)",
        tools_removed.len(),
        tools_added.len(),
        tools_modified.len(),
        breaking_count,
        warning_count,
        info_count,
    );

    let performance_report = build_performance_report(previous, current, options);
    let security_report = build_security_report(previous, current);
    let schema_evolution_report = build_schema_evolution_report(previous, current, &behavior_changes);
    let error_trend_report = build_error_trend_report(previous, current);
    let documentation_score_report = build_documentation_score_report(previous, current);

    Ok(BehavioralDiff {
        version_compatibility,
        tools_added,
        tools_removed,
        tools_modified,
        behavior_changes,
        performance_report,
        security_report,
        schema_evolution_report,
        error_trend_report,
        documentation_score_report,
        severity,
        breaking_count,
        warning_count,
        info_count,
        summary,
    })
}
