//! Schema inference: merging the shapes of N sampled JSON values into a
//! single JSON-Schema-like document, producing output that `drift-schema`
//! can compare directly.

use serde_json::{json, Value};
use std::collections::BTreeMap;

fn type_name(v: &Value) -> &'static str {
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

/// Infers a merged JSON-Schema-like document from a set of sibling JSON
/// values. A field is `required` iff present in every sample; observed
/// types collapse to a single type, a nullable variant, or a `oneOf`.
pub fn infer_schema(values: &[Value]) -> Value {
    if values.is_empty() {
        return json!({});
    }

    let mut groups: BTreeMap<&'static str, Vec<Value>> = BTreeMap::new();
    for v in values {
        groups.entry(type_name(v)).or_default().push(v.clone());
    }

    if groups.len() == 1 {
        let (kind, group) = groups.into_iter().next().unwrap();
        return schema_for_kind(kind, &group);
    }

    if groups.len() == 2 && groups.contains_key("null") {
        let (other_kind, other_group) = groups
            .iter()
            .find(|(k, _)| **k != "null")
            .map(|(k, g)| (*k, g.clone()))
            .unwrap();
        let mut schema = schema_for_kind(other_kind, &other_group);
        if let Some(obj) = schema.as_object_mut() {
            match obj.get("type").cloned() {
                Some(Value::String(t)) => {
                    obj.insert("type".to_string(), json!([t, "null"]));
                    return schema;
                }
                _ => {
                    return json!({"oneOf": [schema, {"type": "null"}]});
                }
            }
        }
        return json!({"oneOf": [schema, {"type": "null"}]});
    }

    let branches: Vec<Value> = groups.iter().map(|(k, g)| schema_for_kind(k, g)).collect();
    json!({"oneOf": branches})
}

fn schema_for_kind(kind: &str, group: &[Value]) -> Value {
    match kind {
        "object" => merge_object(group),
        "array" => merge_array(group),
        other => json!({"type": other}),
    }
}

fn merge_object(group: &[Value]) -> Value {
    let total = group.len();
    let mut field_values: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    let mut field_counts: BTreeMap<String, usize> = BTreeMap::new();

    for v in group {
        if let Value::Object(map) = v {
            for (k, val) in map {
                field_values.entry(k.clone()).or_default().push(val.clone());
                *field_counts.entry(k.clone()).or_insert(0) += 1;
            }
        }
    }

    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();
    for (k, values) in &field_values {
        properties.insert(k.clone(), infer_schema(values));
        if field_counts.get(k) == Some(&total) {
            required.push(k.clone());
        }
    }
    required.sort();

    json!({"type": "object", "properties": properties, "required": required})
}

fn merge_array(group: &[Value]) -> Value {
    let mut items = Vec::new();
    for v in group {
        if let Value::Array(arr) = v {
            items.extend(arr.iter().cloned());
        }
    }
    if items.is_empty() {
        return json!({"type": "array"});
    }
    json!({"type": "array", "items": infer_schema(&items)})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_kind_collapses_to_one_type() {
        let values = vec![json!("a"), json!("b")];
        assert_eq!(infer_schema(&values), json!({"type": "string"}));
    }

    #[test]
    fn nullable_collapses_to_type_array() {
        let values = vec![json!("a"), json!(null)];
        assert_eq!(infer_schema(&values), json!({"type": ["string", "null"]}));
    }

    #[test]
    fn mixed_non_null_kinds_collapse_to_one_of() {
        let values = vec![json!("a"), json!(1)];
        let schema = infer_schema(&values);
        let one_of = schema.get("oneOf").and_then(Value::as_array).unwrap();
        assert_eq!(one_of.len(), 2);
    }

    #[test]
    fn object_field_present_in_every_sample_is_required() {
        let values = vec![json!({"a": 1, "b": 2}), json!({"a": 2})];
        let schema = infer_schema(&values);
        let required: Vec<String> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        assert_eq!(required, vec!["a".to_string()]);
    }

    #[test]
    fn array_items_infer_recursively() {
        let values = vec![json!([1, 2, 3])];
        let schema = infer_schema(&values);
        assert_eq!(schema["type"], json!("array"));
        assert_eq!(schema["items"]["type"], json!("integer"));
    }
}
