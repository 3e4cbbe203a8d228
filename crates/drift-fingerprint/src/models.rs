//! Data types shared across the fingerprinter, evolution tracker,
//! performance tracker, and documentation scorer.

use drift_hash::Hash16;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coarse shape of a tool response's decoded content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Object,
    Array,
    Text,
    Primitive,
    Empty,
}

/// Size bucket derived from the average serialized length of successful
/// samples: tiny ≤200 B, small ≤2 KiB, medium ≤10 KiB, large >10 KiB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeBucket {
    Tiny,
    Small,
    Medium,
    Large,
}

impl SizeBucket {
    pub fn from_avg_len(avg_len: f64) -> Self {
        if avg_len <= 200.0 {
            SizeBucket::Tiny
        } else if avg_len <= 2048.0 {
            SizeBucket::Small
        } else if avg_len <= 10240.0 {
            SizeBucket::Medium
        } else {
            SizeBucket::Large
        }
    }
}

/// A content-addressed summary of the shape of a tool's responses across
/// a batch of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFingerprint {
    pub structure_hash: Hash16,
    pub content_type: ContentType,
    pub fields: Option<Vec<String>>,
    pub array_item_structure: Option<Hash16>,
    pub size: SizeBucket,
    pub is_empty: bool,
    pub sample_count: u32,
    pub confidence: f64,
}

/// Category assigned to a normalized error pattern, in classification
/// priority order (validation takes precedence over not_found, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Permission,
    Timeout,
    RateLimit,
    Internal,
    Other,
}

/// A group of observed error responses sharing the same normalized text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPattern {
    pub category: ErrorCategory,
    pub pattern_hash: Hash16,
    pub example: String,
    pub count: u32,
}

/// One historical inferred-schema observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaHistoryEntry {
    pub hash: Hash16,
    pub schema: serde_json::Value,
    pub observed_at: chrono::DateTime<chrono::Utc>,
    pub sample_count: u32,
}

/// Tracks the inferred response schema's history and stability across
/// successive probe runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSchemaEvolution {
    pub current_hash: Hash16,
    pub history: Vec<SchemaHistoryEntry>,
    pub is_stable: bool,
    pub stability_confidence: f64,
    pub inconsistent_fields: Vec<String>,
    pub sample_count: u32,
}

/// Discrete reliability tier for a performance measurement, derived from
/// sample count and coefficient of variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

/// Latency and reliability statistics for a single tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub std_dev_ms: f64,
    pub success_rate: f64,
    pub confidence: PerformanceConfidence,
}

/// Confidence metadata attached alongside a [`PerformanceStats`] block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceConfidence {
    pub sample_count: u32,
    pub successful_samples: u32,
    pub validation_samples: u32,
    pub total_tests: u32,
    pub standard_deviation: f64,
    pub coefficient_of_variation: f64,
    pub confidence_level: ConfidenceLevel,
}

/// Letter grade derived from [`DocumentationScore::overall_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::A
        } else if score >= 80.0 {
            Grade::B
        } else if score >= 70.0 {
            Grade::C
        } else if score >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

/// Aggregate documentation quality score across every tool in a baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationScore {
    pub overall_score: f64,
    pub grade: Grade,
    pub issue_count: u32,
    pub tool_count: u32,
}

/// A single documentation deficiency found on one tool, emitted by the
/// scorer but not persisted on the baseline itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationIssue {
    pub tool: String,
    pub message: String,
    pub suggestion: String,
}

/// Per-tool component breakdown backing a [`DocumentationScore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDocumentationReport {
    pub tool: String,
    pub description_coverage: f64,
    pub description_quality: f64,
    pub parameter_documentation: f64,
    pub example_coverage: f64,
    pub score: f64,
    pub issues: Vec<DocumentationIssue>,
}

/// Input describing one tool's narrative documentation and schema, fed
/// to the documentation scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDocInput {
    pub name: String,
    pub description: Option<String>,
    pub parameter_descriptions: BTreeMap<String, Option<String>>,
    pub has_examples: bool,
}
