//! Minimal valid fixtures shared across this crate's unit tests.

use crate::models::*;
use chrono::{TimeZone, Utc};
use std::collections::{BTreeMap, BTreeSet};

pub fn sample_baseline() -> Baseline {
    let generated_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let placeholder_hash = drift_hash::Hash16::try_from("0000000000000000").unwrap();

    let tool = ToolCapability {
        name: "read_file".to_string(),
        description: "Reads a file from disk.".to_string(),
        title: Some("Read File".to_string()),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": { "path": { "type": "string" } },
            "required": ["path"]
        }),
        schema_hash: placeholder_hash.clone(),
        annotations: Some(ToolAnnotations { read_only_hint: Some(true), ..Default::default() }),
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
    };

    Baseline {
        format_version: semver::Version::new(1, 0, 0),
        metadata: Metadata {
            mode: ProbeMode::Check,
            generated_at,
            cli_version: "0.1.0".to_string(),
            server_command: "example-server".to_string(),
            server_name: "example-server".to_string(),
            duration_ms: 1200,
            personas: BTreeSet::new(),
            model: None,
        },
        server: ServerInfo {
            name: "example-server".to_string(),
            version: "1.0.0".to_string(),
            protocol_version: "2025-06-18".to_string(),
            capabilities: BTreeSet::from(["tools".to_string()]),
            instructions: None,
        },
        capabilities: Capabilities {
            tools: vec![tool],
            prompts: None,
            resources: None,
            resource_templates: None,
        },
        tool_profiles: BTreeMap::new(),
        workflows: None,
        assertions: Vec::new(),
        documentation_score: None,
        acceptance: None,
        hash: placeholder_hash,
    }
}
