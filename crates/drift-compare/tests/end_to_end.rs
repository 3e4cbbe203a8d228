//! Transcriptions of the comparator's end-to-end scenarios: each builds a
//! before/after pair of baselines and asserts the required shape of the
//! resulting diff.

use chrono::{TimeZone, Utc};
use drift_baseline::{
    Baseline, Capabilities, Metadata, ProbeMode, RiskLevel, SecurityFinding, SecurityFingerprint, Severity,
    ServerInfo, ToolCapability,
};
use drift_compare::{compare_baselines, ComparatorOptions};
use drift_fingerprint::{ConfidenceLevel, ContentType, PerformanceConfidence, ResponseFingerprint, SizeBucket};
use std::collections::{BTreeMap, BTreeSet};

fn placeholder_hash() -> drift_hash::Hash16 {
    drift_hash::Hash16::try_from("0000000000000000").unwrap()
}

fn base_tool(name: &str, input_schema: serde_json::Value) -> ToolCapability {
    ToolCapability {
        name: name.to_string(),
        description: format!("{name} description"),
        title: None,
        input_schema,
        schema_hash: placeholder_hash(),
        annotations: None,
        output_schema: None,
        output_schema_hash: None,
        execution: None,
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
    }
}

fn baseline(tools: Vec<ToolCapability>, protocol_version: &str) -> Baseline {
    let mut tools = tools;
    for tool in &mut tools {
        tool.schema_hash = drift_hash::hash(&tool.input_schema).unwrap();
    }
    Baseline {
        format_version: semver::Version::new(1, 0, 0),
        metadata: Metadata {
            mode: ProbeMode::Check,
            generated_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            cli_version: "0.1.0".to_string(),
            server_command: "example-server".to_string(),
            server_name: "example-server".to_string(),
            duration_ms: 1000,
            personas: BTreeSet::new(),
            model: None,
        },
        server: ServerInfo {
            name: "example-server".to_string(),
            version: "1.0.0".to_string(),
            protocol_version: protocol_version.to_string(),
            capabilities: BTreeSet::from(["tools".to_string()]),
            instructions: None,
        },
        capabilities: Capabilities { tools, prompts: None, resources: None, resource_templates: None },
        tool_profiles: BTreeMap::new(),
        workflows: None,
        assertions: Vec::new(),
        documentation_score: None,
        acceptance: None,
        hash: placeholder_hash(),
    }
}

#[test]
fn scenario_1_tool_removed() {
    let before = baseline(
        vec![
            base_tool("get_weather", serde_json::json!({"type": "object"})),
            base_tool("calculate", serde_json::json!({"type": "object"})),
        ],
        "2025-06-18",
    );
    let after = baseline(vec![base_tool("calculate", serde_json::json!({"type": "object"}))], "2025-06-18");

    let diff = compare_baselines(&before, &after, &ComparatorOptions::default()).unwrap();

    assert_eq!(diff.tools_removed, vec!["get_weather".to_string()]);
    assert!(diff.tools_added.is_empty());
    assert_eq!(diff.severity, Severity::Breaking);
    assert!(diff.breaking_count >= 1);
}

#[test]
fn scenario_2_required_input_field_added() {
    let before_schema = serde_json::json!({
        "type": "object",
        "properties": { "location": { "type": "string" } },
        "required": ["location"]
    });
    let after_schema = serde_json::json!({
        "type": "object",
        "properties": { "location": { "type": "string" }, "units": { "type": "string" } },
        "required": ["location", "units"]
    });

    let before = baseline(vec![base_tool("get_weather", before_schema)], "2025-06-18");
    let after = baseline(vec![base_tool("get_weather", after_schema)], "2025-06-18");

    let diff = compare_baselines(&before, &after, &ComparatorOptions::default()).unwrap();

    let schema_changes: Vec<_> =
        diff.behavior_changes.iter().filter(|c| c.aspect == drift_compare::Aspect::Schema).collect();
    assert!(!schema_changes.is_empty());
    assert!(schema_changes.iter().any(|c| c.severity == Severity::Breaking && c.description.contains("units")));
}

#[test]
fn scenario_3_response_fields_removed() {
    let mut before_tool = base_tool("list_items", serde_json::json!({"type": "object"}));
    before_tool.response_fingerprint = Some(ResponseFingerprint {
        structure_hash: drift_hash::Hash16::try_from("1111111111111111").unwrap(),
        content_type: ContentType::Object,
        fields: Some(vec!["status".to_string(), "data".to_string(), "meta".to_string()]),
        array_item_structure: None,
        size: SizeBucket::Small,
        is_empty: false,
        sample_count: 5,
        confidence: 1.0,
    });

    let mut after_tool = base_tool("list_items", serde_json::json!({"type": "object"}));
    after_tool.response_fingerprint = Some(ResponseFingerprint {
        structure_hash: drift_hash::Hash16::try_from("1111111111111111").unwrap(),
        content_type: ContentType::Object,
        fields: Some(vec!["status".to_string()]),
        array_item_structure: None,
        size: SizeBucket::Small,
        is_empty: false,
        sample_count: 5,
        confidence: 1.0,
    });

    let before = baseline(vec![before_tool], "2025-06-18");
    let after = baseline(vec![after_tool], "2025-06-18");

    let diff = compare_baselines(&before, &after, &ComparatorOptions::default()).unwrap();

    let response_changes: Vec<_> =
        diff.behavior_changes.iter().filter(|c| c.aspect == drift_compare::Aspect::ResponseStructure).collect();
    assert!(response_changes.iter().any(|c| c.severity == Severity::Breaking));
}

#[test]
fn scenario_4_new_critical_security_finding() {
    let before_tool = base_tool("run_query", serde_json::json!({"type": "object"}));

    let mut after_tool = base_tool("run_query", serde_json::json!({"type": "object"}));
    after_tool.security_fingerprint = Some(SecurityFingerprint {
        tested: true,
        categories_tested: BTreeSet::from(["injection".to_string()]),
        findings: vec![SecurityFinding {
            category: "sql_injection".to_string(),
            risk_level: RiskLevel::Critical,
            title: "SQL injection via query parameter".to_string(),
            description: "unsanitized input reaches the query builder".to_string(),
            evidence: "' OR 1=1 --".to_string(),
            remediation: "use parameterized queries".to_string(),
            cwe_id: Some("CWE-89".to_string()),
            parameter: Some("query".to_string()),
            tool: "run_query".to_string(),
        }],
        risk_score: 90,
        tested_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        findings_hash: placeholder_hash(),
    });

    let before = baseline(vec![before_tool], "2025-06-18");
    let after = baseline(vec![after_tool], "2025-06-18");

    let diff = compare_baselines(&before, &after, &ComparatorOptions::default()).unwrap();

    let security_changes: Vec<_> =
        diff.behavior_changes.iter().filter(|c| c.aspect == drift_compare::Aspect::Security).collect();
    assert_eq!(security_changes.len(), 1);
    assert_eq!(security_changes[0].severity, Severity::Breaking);

    let report = diff.security_report.expect("security report should be present");
    assert!(report.new_findings >= 1);
    assert!(report.degraded);
}

fn perf_confidence(level: ConfidenceLevel) -> PerformanceConfidence {
    PerformanceConfidence {
        sample_count: 20,
        successful_samples: 20,
        validation_samples: 20,
        total_tests: 20,
        standard_deviation: 5.0,
        coefficient_of_variation: 0.1,
        confidence_level: level,
    }
}

#[test]
fn scenario_5_performance_regression_with_high_confidence() {
    let mut before_tool = base_tool("search", serde_json::json!({"type": "object"}));
    before_tool.baseline_p50_ms = Some(100.0);
    before_tool.performance_confidence = Some(perf_confidence(ConfidenceLevel::High));

    let mut after_tool = base_tool("search", serde_json::json!({"type": "object"}));
    after_tool.baseline_p50_ms = Some(150.0);
    after_tool.performance_confidence = Some(perf_confidence(ConfidenceLevel::High));

    let before = baseline(vec![before_tool], "2025-06-18");
    let after = baseline(vec![after_tool], "2025-06-18");

    let diff = compare_baselines(&before, &after, &ComparatorOptions::default()).unwrap();

    let report = diff.performance_report.expect("performance report should be present");
    assert!(report.has_regressions);
    assert!(report.regressions.contains(&"search".to_string()));
    assert!(!diff.behavior_changes.iter().any(|c| c.entity.as_deref() == Some("search") && c.description.contains("p50")));
}

#[test]
fn scenario_6_protocol_gated_out() {
    let before_tool = base_tool("read_file", serde_json::json!({"type": "object"}));

    let mut after_tool = base_tool("read_file", serde_json::json!({"type": "object"}));
    after_tool.annotations =
        Some(drift_baseline::ToolAnnotations { read_only_hint: Some(true), ..Default::default() });

    let before = baseline(vec![before_tool], "2024-11-05");
    let after = baseline(vec![after_tool], "2024-11-05");

    let diff = compare_baselines(&before, &after, &ComparatorOptions::default()).unwrap();

    assert!(!diff.behavior_changes.iter().any(|c| c.aspect == drift_compare::Aspect::ToolAnnotations));
    assert_eq!(diff.severity, Severity::None);
}
