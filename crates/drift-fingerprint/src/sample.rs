//! Inputs to the response fingerprinter: one record per probed
//! tool invocation.

use chrono::{DateTime, Utc};

/// Decoded content of a single tool response. The wire format for an
/// MCP-style tool result can be a JSON value, a plain text block, or a
/// list of content blocks; all three are normalized here rather than
/// left as raw transport bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseContent {
    Json(serde_json::Value),
    Text(String),
    Blocks(Vec<ResponseContent>),
    Empty,
}

/// One observed invocation of a tool, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSample {
    pub content: Option<ResponseContent>,
    pub error: Option<String>,
    pub observed_at: DateTime<Utc>,
}

impl ResponseSample {
    pub fn success(content: ResponseContent, observed_at: DateTime<Utc>) -> Self {
        Self { content: Some(content), error: None, observed_at }
    }

    pub fn failure(error: impl Into<String>, observed_at: DateTime<Utc>) -> Self {
        Self { content: None, error: Some(error.into()), observed_at }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// A single latency observation fed to the performance tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencySample {
    pub tool_name: String,
    pub duration_ms: f64,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    pub expected_outcome: Option<bool>,
    pub outcome_correct: Option<bool>,
}
