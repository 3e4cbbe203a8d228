use crate::keys::is_known;
use crate::{ChangeKind, SchemaChange};
use serde_json::Value;
use std::collections::BTreeSet;

/// Compares two JSON-Schema-like trees and returns every structural
/// difference, ordered by path then kind for deterministic output.
pub fn compare_schemas(prev: &Value, curr: &Value) -> Vec<SchemaChange> {
    let mut changes = Vec::new();
    compare_node(prev, curr, "$", &mut changes);
    changes.sort_by(|a, b| {
        a.path
            .cmp(&b.path)
            .then_with(|| format!("{:?}", a.kind).cmp(&format!("{:?}", b.kind)))
    });
    changes
}

fn compare_node(prev: &Value, curr: &Value, path: &str, changes: &mut Vec<SchemaChange>) {
    if prev == curr {
        return;
    }

    compare_type(prev, curr, path, changes);
    compare_const(prev, curr, path, changes);
    compare_enum(prev, curr, path, changes);
    compare_numeric_bound(prev, curr, "minimum", path, true, changes);
    compare_numeric_bound(prev, curr, "maximum", path, false, changes);
    compare_numeric_bound(prev, curr, "exclusiveMinimum", path, true, changes);
    compare_numeric_bound(prev, curr, "exclusiveMaximum", path, false, changes);
    compare_string_bound(prev, curr, "minLength", path, true, changes);
    compare_string_bound(prev, curr, "maxLength", path, false, changes);
    compare_pattern(prev, curr, path, changes);
    compare_format(prev, curr, path, changes);
    compare_default(prev, curr, path, changes);
    compare_description(prev, curr, path, changes);
    compare_additional_properties(prev, curr, path, changes);
    compare_branches(prev, curr, "oneOf", path, false, changes);
    compare_branches(prev, curr, "anyOf", path, false, changes);
    compare_branches(prev, curr, "allOf", path, true, changes);
    compare_unknown_keys(prev, curr, path, changes);

    compare_required(prev, curr, path, changes);
    compare_properties(prev, curr, path, changes);
    compare_items(prev, curr, path, changes);
}

fn field<'a>(v: &'a Value, key: &str) -> Option<&'a Value> {
    v.as_object().and_then(|m| m.get(key))
}

fn str_field<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    field(v, key).and_then(Value::as_str)
}

fn num_field(v: &Value, key: &str) -> Option<f64> {
    field(v, key).and_then(Value::as_f64)
}

/// Builds a deterministic string key for a JSON value, sorting object
/// keys so structurally-equal-but-differently-ordered values compare
/// equal. Used only for set membership, not for hashing or output.
fn stable_key(v: &Value) -> String {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut s = String::from("{");
            for (i, k) in keys.iter().enumerate() {
                if i > 0 {
                    s.push(',');
                }
                s.push_str(&format!("{k:?}:{}", stable_key(&map[*k])));
            }
            s.push('}');
            s
        }
        Value::Array(items) => {
            let mut s = String::from("[");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    s.push(',');
                }
                s.push_str(&stable_key(item));
            }
            s.push(']');
            s
        }
        other => other.to_string(),
    }
}

fn type_tokens(v: &Value) -> Option<BTreeSet<String>> {
    match field(v, "type") {
        Some(Value::String(s)) => Some([s.clone()].into_iter().collect()),
        Some(Value::Array(arr)) => {
            Some(arr.iter().filter_map(|x| x.as_str().map(String::from)).collect())
        }
        _ => None,
    }
}

fn compare_type(prev: &Value, curr: &Value, path: &str, changes: &mut Vec<SchemaChange>) {
    let (Some(pt), Some(ct)) = (type_tokens(prev), type_tokens(curr)) else {
        return;
    };
    if pt == ct {
        return;
    }
    let widening = pt.len() == 1
        && ct.len() == 1
        && pt.contains("integer")
        && ct.contains("number");
    changes.push(SchemaChange {
        path: format!("{path}.type"),
        kind: ChangeKind::TypeChanged,
        before: Some(pt.into_iter().collect::<Vec<_>>().join(",")),
        after: Some(ct.into_iter().collect::<Vec<_>>().join(",")),
        breaking: !widening,
        description: if widening {
            "type widened from integer to number".to_string()
        } else {
            format!("type changed at {path}")
        },
    });
}

fn compare_const(prev: &Value, curr: &Value, path: &str, changes: &mut Vec<SchemaChange>) {
    let p = field(prev, "const");
    let c = field(curr, "const");
    if p == c {
        return;
    }
    changes.push(SchemaChange {
        path: format!("{path}.const"),
        kind: ChangeKind::ConstTightened,
        before: p.map(|v| v.to_string()),
        after: c.map(|v| v.to_string()),
        breaking: true,
        description: format!("const value changed at {path}"),
    });
}

fn values_to_string(values: &[&Value]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

fn compare_enum(prev: &Value, curr: &Value, path: &str, changes: &mut Vec<SchemaChange>) {
    let p = field(prev, "enum").and_then(Value::as_array).cloned().unwrap_or_default();
    let c = field(curr, "enum").and_then(Value::as_array).cloned().unwrap_or_default();
    if p.is_empty() && c.is_empty() {
        return;
    }

    let p_keys: Vec<String> = p.iter().map(stable_key).collect();
    let c_keys: Vec<String> = c.iter().map(stable_key).collect();

    let removed: Vec<&Value> = p
        .iter()
        .zip(p_keys.iter())
        .filter(|(_, k)| !c_keys.contains(k))
        .map(|(v, _)| v)
        .collect();
    let added: Vec<&Value> = c
        .iter()
        .zip(c_keys.iter())
        .filter(|(_, k)| !p_keys.contains(k))
        .map(|(v, _)| v)
        .collect();

    if !removed.is_empty() {
        changes.push(SchemaChange {
            path: format!("{path}.enum"),
            kind: ChangeKind::EnumValueRemoved,
            before: Some(values_to_string(&removed)),
            after: None,
            breaking: true,
            description: format!("enum value(s) removed at {path}: {}", values_to_string(&removed)),
        });
    }
    if !added.is_empty() {
        changes.push(SchemaChange {
            path: format!("{path}.enum"),
            kind: ChangeKind::EnumValueAdded,
            before: None,
            after: Some(values_to_string(&added)),
            breaking: false,
            description: format!("enum value(s) added at {path}: {}", values_to_string(&added)),
        });
    }
}

/// `lower` is true for `minimum`/`exclusiveMinimum` (increasing tightens),
/// false for `maximum`/`exclusiveMaximum` (decreasing tightens).
fn compare_numeric_bound(
    prev: &Value,
    curr: &Value,
    key: &str,
    path: &str,
    lower: bool,
    changes: &mut Vec<SchemaChange>,
) {
    let p = num_field(prev, key);
    let c = num_field(curr, key);
    let (kind, breaking, before, after, description) = match (p, c) {
        (None, None) => return,
        (None, Some(cv)) => (
            ChangeKind::NumericConstraintTightened,
            true,
            None,
            Some(cv.to_string()),
            format!("{key} constraint added at {path}: {cv}"),
        ),
        (Some(pv), None) => (
            ChangeKind::NumericConstraintRelaxed,
            false,
            Some(pv.to_string()),
            None,
            format!("{key} constraint removed at {path}"),
        ),
        (Some(pv), Some(cv)) => {
            if (pv - cv).abs() < f64::EPSILON {
                return;
            }
            let tightened = if lower { cv > pv } else { cv < pv };
            (
                if tightened {
                    ChangeKind::NumericConstraintTightened
                } else {
                    ChangeKind::NumericConstraintRelaxed
                },
                tightened,
                Some(pv.to_string()),
                Some(cv.to_string()),
                format!("{key} changed from {pv} to {cv} at {path}"),
            )
        }
    };
    changes.push(SchemaChange {
        path: format!("{path}.{key}"),
        kind,
        before,
        after,
        breaking,
        description,
    });
}

/// `tightens_on_increase` is true for `minLength` (increasing tightens),
/// false for `maxLength` (decreasing tightens).
fn compare_string_bound(
    prev: &Value,
    curr: &Value,
    key: &str,
    path: &str,
    tightens_on_increase: bool,
    changes: &mut Vec<SchemaChange>,
) {
    let p = num_field(prev, key);
    let c = num_field(curr, key);
    let (kind, breaking, before, after, description) = match (p, c) {
        (None, None) => return,
        (None, Some(cv)) => (
            ChangeKind::StringConstraintTightened,
            true,
            None,
            Some(cv.to_string()),
            format!("{key} constraint added at {path}: {cv}"),
        ),
        (Some(pv), None) => (
            ChangeKind::StringConstraintRelaxed,
            false,
            Some(pv.to_string()),
            None,
            format!("{key} constraint removed at {path}"),
        ),
        (Some(pv), Some(cv)) => {
            if (pv - cv).abs() < f64::EPSILON {
                return;
            }
            let tightened = if tightens_on_increase { cv > pv } else { cv < pv };
            (
                if tightened {
                    ChangeKind::StringConstraintTightened
                } else {
                    ChangeKind::StringConstraintRelaxed
                },
                tightened,
                Some(pv.to_string()),
                Some(cv.to_string()),
                format!("{key} changed from {pv} to {cv} at {path}"),
            )
        }
    };
    changes.push(SchemaChange {
        path: format!("{path}.{key}"),
        kind,
        before,
        after,
        breaking,
        description,
    });
}

fn compare_pattern(prev: &Value, curr: &Value, path: &str, changes: &mut Vec<SchemaChange>) {
    let p = str_field(prev, "pattern");
    let c = str_field(curr, "pattern");
    if p == c {
        return;
    }
    // Whether a changed pattern narrows or widens the accepted set isn't
    // decidable from the regex text alone; any observed change is treated
    // as a narrowing (breaking), matching the conservative default.
    let breaking = !(p.is_some() && c.is_none());
    changes.push(SchemaChange {
        path: format!("{path}.pattern"),
        kind: ChangeKind::PatternChanged,
        before: p.map(str::to_string),
        after: c.map(str::to_string),
        breaking,
        description: format!("pattern changed at {path}"),
    });
}

fn compare_format(prev: &Value, curr: &Value, path: &str, changes: &mut Vec<SchemaChange>) {
    let p = str_field(prev, "format");
    let c = str_field(curr, "format");
    if p == c {
        return;
    }
    changes.push(SchemaChange {
        path: format!("{path}.format"),
        kind: ChangeKind::FormatChanged,
        before: p.map(str::to_string),
        after: c.map(str::to_string),
        breaking: true,
        description: format!("format changed at {path}"),
    });
}

fn compare_default(prev: &Value, curr: &Value, path: &str, changes: &mut Vec<SchemaChange>) {
    let p = field(prev, "default");
    let c = field(curr, "default");
    if p == c {
        return;
    }
    changes.push(SchemaChange {
        path: format!("{path}.default"),
        kind: ChangeKind::DefaultChanged,
        before: p.map(|v| v.to_string()),
        after: c.map(|v| v.to_string()),
        breaking: false,
        description: format!("default value changed at {path}"),
    });
}

fn compare_description(prev: &Value, curr: &Value, path: &str, changes: &mut Vec<SchemaChange>) {
    let p = str_field(prev, "description");
    let c = str_field(curr, "description");
    if p == c {
        return;
    }
    changes.push(SchemaChange {
        path: format!("{path}.description"),
        kind: ChangeKind::DescriptionChanged,
        before: p.map(str::to_string),
        after: c.map(str::to_string),
        breaking: false,
        description: format!("description changed at {path}"),
    });
}

fn additional_properties_permissive(v: &Value) -> bool {
    match field(v, "additionalProperties") {
        None => true,
        Some(Value::Bool(b)) => *b,
        Some(_) => true,
    }
}

fn compare_additional_properties(
    prev: &Value,
    curr: &Value,
    path: &str,
    changes: &mut Vec<SchemaChange>,
) {
    let p = additional_properties_permissive(prev);
    let c = additional_properties_permissive(curr);
    if p == c {
        return;
    }
    let (kind, breaking, description) = if p && !c {
        (
            ChangeKind::AdditionalPropertiesTightened,
            true,
            format!("additionalProperties restricted at {path}"),
        )
    } else {
        (
            ChangeKind::AdditionalPropertiesRelaxed,
            false,
            format!("additionalProperties relaxed at {path}"),
        )
    };
    changes.push(SchemaChange {
        path: format!("{path}.additionalProperties"),
        kind,
        before: Some(p.to_string()),
        after: Some(c.to_string()),
        breaking,
        description,
    });
}

fn branches(v: &Value, key: &str) -> Vec<Value> {
    field(v, key).and_then(Value::as_array).cloned().unwrap_or_default()
}

/// Compares a `oneOf`/`anyOf`/`allOf` branch list. For `oneOf`/`anyOf`
/// (a union of acceptable alternatives), removing a branch narrows what's
/// accepted (breaking) and adding one widens it (non-breaking). `allOf`
/// composes constraints by intersection, so the polarity inverts: removing
/// a branch relaxes the combined constraint (non-breaking), adding one
/// tightens it (breaking) — pass `invert = true` for that case.
fn compare_branches(
    prev: &Value,
    curr: &Value,
    key: &str,
    path: &str,
    invert: bool,
    changes: &mut Vec<SchemaChange>,
) {
    let pb = branches(prev, key);
    let cb = branches(curr, key);
    if pb.is_empty() && cb.is_empty() {
        return;
    }

    let p_keys: Vec<String> = pb.iter().map(stable_key).collect();
    let c_keys: Vec<String> = cb.iter().map(stable_key).collect();

    for (branch, key_str) in pb.iter().zip(p_keys.iter()) {
        if !c_keys.contains(key_str) {
            changes.push(SchemaChange {
                path: format!("{path}.{key}"),
                kind: ChangeKind::BranchRemoved,
                before: Some(branch.to_string()),
                after: None,
                breaking: !invert,
                description: format!("{key} branch removed at {path}"),
            });
        }
    }
    for (branch, key_str) in cb.iter().zip(c_keys.iter()) {
        if !p_keys.contains(key_str) {
            changes.push(SchemaChange {
                path: format!("{path}.{key}"),
                kind: ChangeKind::BranchAdded,
                before: None,
                after: Some(branch.to_string()),
                breaking: invert,
                description: format!("{key} branch added at {path}"),
            });
        }
    }
}

fn compare_unknown_keys(prev: &Value, curr: &Value, path: &str, changes: &mut Vec<SchemaChange>) {
    let p_obj = prev.as_object();
    let c_obj = curr.as_object();
    let mut keys: BTreeSet<&String> = BTreeSet::new();
    if let Some(m) = p_obj {
        keys.extend(m.keys().filter(|k| !is_known(k)));
    }
    if let Some(m) = c_obj {
        keys.extend(m.keys().filter(|k| !is_known(k)));
    }

    for key in keys {
        let pv = p_obj.and_then(|m| m.get(key));
        let cv = c_obj.and_then(|m| m.get(key));
        if pv == cv {
            continue;
        }
        changes.push(SchemaChange {
            path: format!("{path}.{key}"),
            kind: ChangeKind::UnknownKeyDivergence,
            before: pv.map(|v| v.to_string()),
            after: cv.map(|v| v.to_string()),
            breaking: false,
            description: format!("unrecognized keyword '{key}' diverged at {path}"),
        });
    }
}

fn required_set(v: &Value) -> BTreeSet<String> {
    field(v, "required")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(|x| x.as_str().map(String::from)).collect())
        .unwrap_or_default()
}

fn compare_required(prev: &Value, curr: &Value, path: &str, changes: &mut Vec<SchemaChange>) {
    let p_req = required_set(prev);
    let c_req = required_set(curr);

    for name in c_req.difference(&p_req) {
        changes.push(SchemaChange {
            path: format!("{path}.required.{name}"),
            kind: ChangeKind::RequiredAdded,
            before: None,
            after: Some(name.clone()),
            breaking: true,
            description: format!("'{name}' became required at {path}"),
        });
    }
    for name in p_req.difference(&c_req) {
        changes.push(SchemaChange {
            path: format!("{path}.required.{name}"),
            kind: ChangeKind::RequiredRemoved,
            before: Some(name.clone()),
            after: None,
            breaking: false,
            description: format!("'{name}' is no longer required at {path}"),
        });
    }
}

fn compare_properties(prev: &Value, curr: &Value, path: &str, changes: &mut Vec<SchemaChange>) {
    let p_props = field(prev, "properties").and_then(Value::as_object);
    let c_props = field(curr, "properties").and_then(Value::as_object);
    if p_props.is_none() && c_props.is_none() {
        return;
    }
    let curr_required = required_set(curr);

    let mut names: BTreeSet<&String> = BTreeSet::new();
    if let Some(m) = p_props {
        names.extend(m.keys());
    }
    if let Some(m) = c_props {
        names.extend(m.keys());
    }

    for name in names {
        let p_val = p_props.and_then(|m| m.get(name));
        let c_val = c_props.and_then(|m| m.get(name));
        let child_path = format!("{path}.properties.{name}");
        match (p_val, c_val) {
            (Some(_), None) => changes.push(SchemaChange {
                path: child_path,
                kind: ChangeKind::PropertyRemoved,
                before: Some(name.clone()),
                after: None,
                breaking: true,
                description: format!("property '{name}' removed at {path}"),
            }),
            (None, Some(_)) => {
                let breaking = curr_required.contains(name);
                changes.push(SchemaChange {
                    path: child_path,
                    kind: ChangeKind::PropertyAdded,
                    before: None,
                    after: Some(name.clone()),
                    breaking,
                    description: format!("property '{name}' added at {path}"),
                });
            }
            (Some(pv), Some(cv)) => compare_node(pv, cv, &child_path, changes),
            (None, None) => unreachable!(),
        }
    }
}

fn compare_items(prev: &Value, curr: &Value, path: &str, changes: &mut Vec<SchemaChange>) {
    if let (Some(p), Some(c)) = (field(prev, "items"), field(curr, "items")) {
        compare_node(p, c, &format!("{path}.items"), changes);
    }
}
