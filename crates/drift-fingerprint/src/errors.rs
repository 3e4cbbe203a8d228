//! Error-pattern extraction: normalizing and classifying the raw error
//! strings observed across a batch of samples into [`ErrorPattern`]s.

use crate::error::FingerprintError;
use crate::models::{ErrorCategory, ErrorPattern};
use crate::sample::ResponseSample;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

const MAX_EXAMPLE_LEN: usize = 200;

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").unwrap()
});
static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}[t ]\d{2}:\d{2}:\d{2}(\.\d+)?(z|[+-]\d{2}:\d{2})?").unwrap()
});
static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z][a-z0-9+.-]*://\S+").unwrap());
static PATH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(/[\w.\-]+){2,}").unwrap());
static QUOTED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"'[^']*'|"[^"]*""#).unwrap());
static NUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Normalizes a raw error string into a stable, comparable form:
/// lowercased, with UUIDs/timestamps/URLs/paths/quoted strings/numeric
/// ids replaced by canonical placeholders, truncated to 200 chars.
pub fn normalize_error(raw: &str) -> String {
    let mut s = raw.to_lowercase();
    s = UUID_RE.replace_all(&s, "<uuid>").into_owned();
    s = TIMESTAMP_RE.replace_all(&s, "<ts>").into_owned();
    s = URL_RE.replace_all(&s, "<url>").into_owned();
    s = PATH_RE.replace_all(&s, "<path>").into_owned();
    s = QUOTED_RE.replace_all(&s, "<str>").into_owned();
    s = NUM_RE.replace_all(&s, "<num>").into_owned();
    s.truncate(MAX_EXAMPLE_LEN);
    s
}

/// Classifies a raw (pre-normalization) error string into a category by
/// keyword heuristics, checked in priority order.
pub fn classify_error(raw: &str) -> ErrorCategory {
    let s = raw.to_lowercase();
    let any = |words: &[&str]| words.iter().any(|w| s.contains(w));

    if any(&["invalid", "validation", "required field", "must be", "malformed", "expected type"]) {
        ErrorCategory::Validation
    } else if any(&["not found", "does not exist", "no such", "404", "unknown tool", "unknown resource"]) {
        ErrorCategory::NotFound
    } else if any(&["permission", "forbidden", "unauthorized", "access denied", "403", "401"]) {
        ErrorCategory::Permission
    } else if any(&["timeout", "timed out", "deadline exceeded"]) {
        ErrorCategory::Timeout
    } else if any(&["rate limit", "too many requests", "429", "throttle"]) {
        ErrorCategory::RateLimit
    } else if any(&["internal error", "internal server error", "panic", "unexpected error", "500"]) {
        ErrorCategory::Internal
    } else {
        ErrorCategory::Other
    }
}

/// Extracts a deduplicated, grouped set of [`ErrorPattern`]s from a batch
/// of samples. Samples without an `error` field contribute nothing.
pub fn extract_error_patterns(samples: &[ResponseSample]) -> Result<Vec<ErrorPattern>, FingerprintError> {
    let mut groups: BTreeMap<String, (ErrorCategory, String, u32)> = BTreeMap::new();

    for sample in samples {
        let Some(raw) = &sample.error else { continue };
        let normalized = normalize_error(raw);
        let category = classify_error(raw);
        let entry = groups
            .entry(normalized.clone())
            .or_insert_with(|| (category, raw.chars().take(MAX_EXAMPLE_LEN).collect(), 0));
        entry.2 += 1;
    }

    let mut patterns = Vec::with_capacity(groups.len());
    for (normalized, (category, example, count)) in groups {
        let pattern_hash = drift_hash::hash(&serde_json::Value::String(normalized))?;
        patterns.push(ErrorPattern { category, pattern_hash, example, count });
    }
    patterns.sort_by(|a, b| a.pattern_hash.as_str().cmp(b.pattern_hash.as_str()));
    Ok(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn failure(msg: &str) -> ResponseSample {
        ResponseSample::failure(msg, Utc::now())
    }

    #[test]
    fn normalizes_uuid_and_number_placeholders() {
        let s = normalize_error("User 123e4567-e89b-12d3-a456-426614174000 not found, id=42");
        assert!(s.contains("<uuid>"));
        assert!(s.contains("<num>"));
    }

    #[test]
    fn classifies_validation_before_not_found() {
        assert_eq!(classify_error("invalid input: required field missing"), ErrorCategory::Validation);
    }

    #[test]
    fn classifies_not_found() {
        assert_eq!(classify_error("resource not found"), ErrorCategory::NotFound);
    }

    #[test]
    fn classifies_permission() {
        assert_eq!(classify_error("access denied: unauthorized"), ErrorCategory::Permission);
    }

    #[test]
    fn classifies_timeout_before_internal() {
        assert_eq!(classify_error("request timed out after internal retry"), ErrorCategory::Timeout);
    }

    #[test]
    fn classifies_other_when_no_keyword_matches() {
        assert_eq!(classify_error("something weird happened"), ErrorCategory::Other);
    }

    #[test]
    fn groups_by_normalized_text_and_counts() {
        let samples = vec![
            failure("item 123 not found"),
            failure("item 456 not found"),
            failure("permission denied"),
        ];
        let patterns = extract_error_patterns(&samples).unwrap();
        assert_eq!(patterns.len(), 2);
        assert!(patterns.iter().any(|p| p.count == 2));
    }
}
