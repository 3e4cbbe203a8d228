//! The set of JSON-Schema keywords the comparator understands explicitly.
//!
//! Anything outside this set is an "unknown/extension" key compared by
//! deep equality rather than by a dedicated compatibility rule.

pub const KNOWN_KEYS: &[&str] = &[
    "type",
    "properties",
    "required",
    "items",
    "enum",
    "const",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "minLength",
    "maxLength",
    "pattern",
    "format",
    "default",
    "description",
    "additionalProperties",
    "oneOf",
    "anyOf",
    "allOf",
];

pub fn is_known(key: &str) -> bool {
    KNOWN_KEYS.contains(&key)
}
