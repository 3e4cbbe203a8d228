//! Deterministic canonical JSON serialization.
//!
//! Canonical form is close to RFC 8785 (JSON Canonicalization Scheme) but
//! diverges from it in two places the spec calls out explicitly:
//!
//! - Object keys are sorted by Unicode code point, not by UTF-16 code
//!   unit as RFC 8785 mandates. For valid UTF-8 `&str`, byte-wise
//!   ordering already matches code-point ordering, so this is a plain
//!   `sort()`.
//! - String escaping uses the minimal set (quote, backslash, control
//!   characters as `\uXXXX`) rather than RFC 8785's named escapes for
//!   backspace/form-feed/newline/carriage-return/tab.
//!
//! Non-finite numbers are rejected with [`EncodingError::NonFiniteNumber`]
//! instead of silently degrading to `null`.

use crate::error::EncodingError;
use serde_json::Value;

/// Canonicalizes a JSON value into its canonical byte representation.
///
/// Returns the canonical form as a `String` (always valid UTF-8 JSON
/// text); callers that need bytes for hashing can call `.into_bytes()`.
pub fn canonicalize(value: &Value) -> Result<String, EncodingError> {
    let mut out = String::new();
    write_value(value, "$", &mut out)?;
    Ok(out)
}

fn write_value(value: &Value, path: &str, out: &mut String) -> Result<(), EncodingError> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&canonicalize_number(n, path)?),
        Value::String(s) => out.push_str(&canonicalize_string(s)),
        Value::Array(items) => write_array(items, path, out)?,
        Value::Object(map) => write_object(map, path, out)?,
    }
    Ok(())
}

fn write_array(items: &[Value], path: &str, out: &mut String) -> Result<(), EncodingError> {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_value(item, &format!("{path}[{i}]"), out)?;
    }
    out.push(']');
    Ok(())
}

fn write_object(
    map: &serde_json::Map<String, Value>,
    path: &str,
    out: &mut String,
) -> Result<(), EncodingError> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    out.push('{');
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&canonicalize_string(key));
        out.push(':');
        write_value(&map[*key], &format!("{path}.{key}"), out)?;
    }
    out.push('}');
    Ok(())
}

/// Formats a number in minimal round-tripping form.
///
/// Integers (including those carried in an `f64` with a zero fractional
/// part) are emitted without a decimal point; `-0` collapses to `0`.
fn canonicalize_number(n: &serde_json::Number, path: &str) -> Result<String, EncodingError> {
    if let Some(i) = n.as_i64() {
        return Ok(i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return Ok(u.to_string());
    }

    let f = n
        .as_f64()
        .ok_or_else(|| EncodingError::NonFiniteNumber { path: path.to_string() })?;
    if !f.is_finite() {
        return Err(EncodingError::NonFiniteNumber { path: path.to_string() });
    }
    if f == 0.0 {
        return Ok("0".to_string());
    }
    if f.fract() == 0.0 && f.abs() < 1e15 {
        return Ok((f as i64).to_string());
    }
    // Rust's Display for f64 already produces the shortest string that
    // round-trips (Grisu3-derived since 1.55), matching JCS intent.
    Ok(format!("{f}"))
}

/// Escapes a string using the minimal required set: quote, backslash,
/// and `\u00XX` for control characters. No named shorthand escapes.
fn canonicalize_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
