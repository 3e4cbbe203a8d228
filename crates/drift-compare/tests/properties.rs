//! Property-based tests for the comparator's quantified invariants.

use chrono::{TimeZone, Utc};
use drift_baseline::{Baseline, Capabilities, Metadata, ProbeMode, Severity, ServerInfo, ToolCapability};
use drift_compare::{apply_severity_config, compare_baselines, Aspect, ComparatorOptions, SeverityConfig};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn tool_with_schema(name: &str, schema: serde_json::Value) -> ToolCapability {
    ToolCapability {
        name: name.to_string(),
        description: "a tool".to_string(),
        title: None,
        schema_hash: drift_hash::hash(&schema).unwrap(),
        input_schema: schema,
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

fn baseline_with_tools(tools: Vec<ToolCapability>, protocol_version: &str) -> Baseline {
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
        hash: drift_hash::Hash16::try_from("0000000000000000").unwrap(),
    }
}

fn arb_tool_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{3,8}", 0..6).prop_map(|mut names| {
        names.sort();
        names.dedup();
        names
    })
}

proptest! {
    #[test]
    fn idempotence_on_identical_baselines(names in arb_tool_names()) {
        let tools: Vec<ToolCapability> =
            names.iter().map(|n| tool_with_schema(n, serde_json::json!({"type": "object"}))).collect();
        let a = baseline_with_tools(tools.clone(), "2025-06-18");
        let b = baseline_with_tools(tools, "2025-06-18");

        let diff = compare_baselines(&a, &b, &ComparatorOptions::default()).unwrap();

        prop_assert_eq!(diff.severity, Severity::None);
        prop_assert!(diff.behavior_changes.is_empty());
        prop_assert!(diff.tools_added.is_empty());
        prop_assert!(diff.tools_removed.is_empty());
    }

    #[test]
    fn removed_tools_are_always_breaking(
        kept in arb_tool_names(),
        removed_extra in "[a-z]{3,8}",
    ) {
        let mut before_names = kept.clone();
        if !before_names.contains(&removed_extra) {
            before_names.push(removed_extra.clone());
        }
        let before_tools: Vec<ToolCapability> =
            before_names.iter().map(|n| tool_with_schema(n, serde_json::json!({"type": "object"}))).collect();
        let after_tools: Vec<ToolCapability> =
            kept.iter().map(|n| tool_with_schema(n, serde_json::json!({"type": "object"}))).collect();

        let before = baseline_with_tools(before_tools, "2025-06-18");
        let after = baseline_with_tools(after_tools, "2025-06-18");

        let diff = compare_baselines(&before, &after, &ComparatorOptions::default()).unwrap();

        if !kept.contains(&removed_extra) {
            prop_assert!(diff.tools_removed.contains(&removed_extra));
            prop_assert!(diff.severity >= Severity::Breaking);
        }
    }

    #[test]
    fn ordering_is_always_sorted_by_stable_key(names in arb_tool_names()) {
        let before_tools: Vec<ToolCapability> = names
            .iter()
            .map(|n| tool_with_schema(n, serde_json::json!({"type": "object", "properties": {"a": {"type": "string"}}})))
            .collect();
        let after_tools: Vec<ToolCapability> = names
            .iter()
            .map(|n| tool_with_schema(n, serde_json::json!({"type": "object", "properties": {"a": {"type": "number"}}})))
            .collect();

        let before = baseline_with_tools(before_tools, "2025-06-18");
        let after = baseline_with_tools(after_tools, "2025-06-18");

        let diff = compare_baselines(&before, &after, &ComparatorOptions::default()).unwrap();

        let keys: Vec<_> = diff.behavior_changes.iter().map(|c| c.sort_key()).collect();
        let mut sorted_keys = keys.clone();
        sorted_keys.sort();
        prop_assert_eq!(keys, sorted_keys);
    }

    #[test]
    fn severity_monotonicity_under_policy(
        names in arb_tool_names(),
        suppress_warnings in any::<bool>(),
    ) {
        let before_tools: Vec<ToolCapability> = names
            .iter()
            .map(|n| tool_with_schema(n, serde_json::json!({"type": "object", "properties": {"a": {"type": "string"}}})))
            .collect();
        let after_tools: Vec<ToolCapability> = names
            .iter()
            .map(|n| tool_with_schema(n, serde_json::json!({"type": "object", "properties": {"a": {"type": "number"}}})))
            .collect();

        let before = baseline_with_tools(before_tools, "2025-06-18");
        let after = baseline_with_tools(after_tools, "2025-06-18");

        let diff = compare_baselines(&before, &after, &ComparatorOptions::default()).unwrap();
        let config = SeverityConfig { suppress_warnings, ..Default::default() };
        let filtered = apply_severity_config(&diff, &config);

        prop_assert!(filtered.severity <= diff.severity);
    }

    #[test]
    fn protocol_gating_suppresses_annotation_changes_below_gate(names in arb_tool_names()) {
        let before_tools: Vec<ToolCapability> =
            names.iter().map(|n| tool_with_schema(n, serde_json::json!({"type": "object"}))).collect();
        let mut after_tools = before_tools.clone();
        for tool in &mut after_tools {
            tool.annotations =
                Some(drift_baseline::ToolAnnotations { read_only_hint: Some(true), ..Default::default() });
        }

        let before = baseline_with_tools(before_tools, "2024-11-05");
        let after = baseline_with_tools(after_tools, "2024-11-05");

        let diff = compare_baselines(&before, &after, &ComparatorOptions::default()).unwrap();

        prop_assert!(!diff.behavior_changes.iter().any(|c| c.aspect == Aspect::ToolAnnotations));
    }
}
