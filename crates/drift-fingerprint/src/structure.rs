//! Per-sample structure signatures and their aggregation into a
//! [`ResponseFingerprint`].

use crate::error::FingerprintError;
use crate::inference::infer_schema;
use crate::models::{ContentType, ResponseFingerprint, SizeBucket};
use crate::sample::{ResponseContent, ResponseSample};
use serde_json::{json, Value};
use std::collections::BTreeMap;

const MAX_SIGNATURE_DEPTH: usize = 10;

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Depth-limited structural signature of a JSON value: at each level,
/// node kind, sorted object keys, and a representative item signature
/// for arrays.
fn json_signature(v: &Value, depth: usize) -> Value {
    if depth == 0 {
        return json!({"kind": json_kind(v)});
    }
    match v {
        Value::Array(items) => {
            let item = items.first().map(|i| json_signature(i, depth - 1));
            json!({"kind": "array", "item": item})
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            json!({"kind": "object", "keys": keys})
        }
        other => json!({"kind": json_kind(other)}),
    }
}

/// Structural signature of a decoded response, independent of the
/// top-level content wrapper.
fn content_signature(content: &ResponseContent) -> Value {
    match content {
        ResponseContent::Json(v) => json_signature(v, MAX_SIGNATURE_DEPTH),
        ResponseContent::Text(_) => json!({"kind": "string"}),
        ResponseContent::Blocks(items) => {
            let item = items.first().map(content_signature);
            json!({"kind": "array", "item": item})
        }
        ResponseContent::Empty => json!({"kind": "null"}),
    }
}

fn content_type(content: &ResponseContent) -> ContentType {
    match content {
        ResponseContent::Json(Value::Null) => ContentType::Empty,
        ResponseContent::Json(Value::Object(_)) => ContentType::Object,
        ResponseContent::Json(Value::Array(_)) => ContentType::Array,
        ResponseContent::Json(_) => ContentType::Primitive,
        ResponseContent::Text(s) if s.is_empty() => ContentType::Empty,
        ResponseContent::Text(_) => ContentType::Text,
        ResponseContent::Blocks(items) if items.is_empty() => ContentType::Empty,
        ResponseContent::Blocks(_) => ContentType::Array,
        ResponseContent::Empty => ContentType::Empty,
    }
}

fn serialized_len(content: &ResponseContent) -> usize {
    match content {
        ResponseContent::Json(v) => serde_json::to_string(v).map(|s| s.len()).unwrap_or(0),
        ResponseContent::Text(s) => s.len(),
        ResponseContent::Blocks(items) => items.iter().map(serialized_len).sum(),
        ResponseContent::Empty => 0,
    }
}

fn top_level_fields(content: &ResponseContent) -> Option<Vec<String>> {
    match content {
        ResponseContent::Json(Value::Object(map)) => {
            let mut keys: Vec<String> = map.keys().cloned().collect();
            keys.sort();
            Some(keys)
        }
        _ => None,
    }
}

fn array_items(content: &ResponseContent) -> Option<Vec<Value>> {
    match content {
        ResponseContent::Json(Value::Array(items)) => Some(items.clone()),
        _ => None,
    }
}

/// Result of fingerprinting a batch of samples: the fingerprint itself,
/// the merged inferred schema (JSON-Schema-like, `None` if no successful
/// JSON sample was observed), and the extracted error patterns.
pub struct FingerprintResult {
    pub fingerprint: ResponseFingerprint,
    pub inferred_schema: Option<Value>,
}

/// Computes a [`ResponseFingerprint`] and inferred schema from a batch of
/// response samples. Error samples contribute nothing here; callers
/// separately run [`crate::errors::extract_error_patterns`] over the same
/// batch.
pub fn compute_fingerprint(samples: &[ResponseSample]) -> Result<FingerprintResult, FingerprintError> {
    let successes: Vec<&ResponseContent> =
        samples.iter().filter_map(|s| if s.is_success() { s.content.as_ref() } else { None }).collect();

    let sample_count = successes.len() as u32;

    if successes.is_empty() {
        let fingerprint = ResponseFingerprint {
            structure_hash: drift_hash::hash(&json!({"kind": "null"}))?,
            content_type: ContentType::Empty,
            fields: None,
            array_item_structure: None,
            size: SizeBucket::Tiny,
            is_empty: true,
            sample_count: 0,
            confidence: 0.0,
        };
        return Ok(FingerprintResult { fingerprint, inferred_schema: None });
    }

    let signatures: Vec<Value> = successes.iter().map(|c| content_signature(c)).collect();
    let mut counts: BTreeMap<String, (Value, u32)> = BTreeMap::new();
    let mut order: Vec<String> = Vec::new();
    for sig in &signatures {
        let key = sig.to_string();
        let entry = counts.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            (sig.clone(), 0)
        });
        entry.1 += 1;
    }
    let mode_key = order
        .iter()
        .max_by_key(|k| counts[*k].1)
        .cloned()
        .unwrap_or_default();
    let (mode_signature, mode_count) = counts.get(&mode_key).cloned().unwrap_or((json!(null), 0));

    let structure_hash = drift_hash::hash(&mode_signature)?;
    let confidence = mode_count as f64 / sample_count as f64;

    let representative_idx = signatures
        .iter()
        .position(|sig| sig.to_string() == mode_key)
        .unwrap_or(0);
    let representative: &ResponseContent = successes[representative_idx];

    let content_type_value = content_type(representative);
    let is_empty = content_type_value == ContentType::Empty;

    let fields = {
        let mut all_fields: std::collections::BTreeSet<String> = Default::default();
        let mut any_object = false;
        for c in &successes {
            if let Some(fs) = top_level_fields(c) {
                any_object = true;
                all_fields.extend(fs);
            }
        }
        if any_object {
            Some(all_fields.into_iter().collect())
        } else {
            None
        }
    };

    let array_item_structure = if content_type_value == ContentType::Array {
        array_items(representative)
            .and_then(|items| items.first().map(|i| json_signature(i, MAX_SIGNATURE_DEPTH - 1)))
            .map(|sig| drift_hash::hash(&sig))
            .transpose()?
    } else {
        None
    };

    let avg_len = successes.iter().map(|c| serialized_len(c) as f64).sum::<f64>() / sample_count as f64;
    let size = SizeBucket::from_avg_len(avg_len);

    let json_values: Vec<Value> = successes
        .iter()
        .filter_map(|c| match c {
            ResponseContent::Json(v) => Some(v.clone()),
            _ => None,
        })
        .collect();
    let inferred_schema = if json_values.is_empty() { None } else { Some(infer_schema(&json_values)) };

    let fingerprint = ResponseFingerprint {
        structure_hash,
        content_type: content_type_value,
        fields,
        array_item_structure,
        size,
        is_empty,
        sample_count,
        confidence,
    };

    Ok(FingerprintResult { fingerprint, inferred_schema })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(v: Value) -> ResponseSample {
        ResponseSample::success(ResponseContent::Json(v), Utc::now())
    }

    #[test]
    fn empty_batch_yields_empty_fingerprint() {
        let result = compute_fingerprint(&[]).unwrap();
        assert!(result.fingerprint.is_empty);
        assert_eq!(result.fingerprint.sample_count, 0);
    }

    #[test]
    fn consistent_object_samples_have_full_confidence() {
        let samples = vec![sample(json!({"a": 1})), sample(json!({"a": 2}))];
        let result = compute_fingerprint(&samples).unwrap();
        assert_eq!(result.fingerprint.confidence, 1.0);
        assert_eq!(result.fingerprint.content_type, ContentType::Object);
        assert_eq!(result.fingerprint.fields, Some(vec!["a".to_string()]));
    }

    #[test]
    fn inconsistent_structures_reduce_confidence() {
        let samples = vec![sample(json!({"a": 1})), sample(json!({"a": 1})), sample(json!([1, 2]))];
        let result = compute_fingerprint(&samples).unwrap();
        assert!(result.fingerprint.confidence < 1.0);
        assert_eq!(result.fingerprint.content_type, ContentType::Object);
    }

    #[test]
    fn array_content_records_item_structure() {
        let samples = vec![sample(json!([1, 2, 3]))];
        let result = compute_fingerprint(&samples).unwrap();
        assert_eq!(result.fingerprint.content_type, ContentType::Array);
        assert!(result.fingerprint.array_item_structure.is_some());
    }

    #[test]
    fn inferred_schema_present_only_for_json_samples() {
        let samples = vec![sample(json!({"a": 1}))];
        let result = compute_fingerprint(&samples).unwrap();
        assert!(result.inferred_schema.is_some());
    }
}
