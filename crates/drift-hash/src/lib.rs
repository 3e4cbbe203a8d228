//! Canonical JSON serialization and content-addressed hashing.
//!
//! This crate is the foundation the rest of the workspace builds on:
//! every other crate that needs a stable identity for a JSON value
//! (a tool schema, a response shape, a whole baseline) goes through
//! [`canonicalize`] and [`hash`] here rather than hashing raw
//! `serde_json::Value` bytes, which are not ordering- or
//! formatting-stable across producers.
//!
//! Canonicalization follows RFC 8785 in spirit, with two deliberate
//! departures documented on [`canonicalize::canonicalize`]: code-point
//! (not UTF-16) key ordering, and a minimal string escape set. Hashing
//! truncates SHA-256 to 16 lowercase hex characters, represented by the
//! [`Hash16`] newtype.

mod canonicalize;
mod error;
mod hash16;

pub use canonicalize::canonicalize;
pub use error::EncodingError;
pub use hash16::Hash16;

use sha2::{Digest, Sha256};

/// Computes the content-addressed hash of a JSON value.
///
/// Equivalent to `Hash16::from(sha256(canonicalize(value)))` truncated
/// to the first 16 lowercase hex characters of the digest.
pub fn hash(value: &serde_json::Value) -> Result<Hash16, EncodingError> {
    let canonical = canonicalize(value)?;
    Ok(hash_canonical_str(&canonical))
}

fn hash_canonical_str(canonical: &str) -> Hash16 {
    let digest = Sha256::digest(canonical.as_bytes());
    let hex = format!("{digest:x}");
    Hash16::from_digest_hex(&hex[..16])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hash_is_deterministic() {
        let v = json!({"b": 1, "a": 2});
        let h1 = hash(&v).unwrap();
        let h2 = hash(&v).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn hash_ignores_key_order() {
        let v1 = json!({"a": 1, "b": 2});
        let v2 = json!({"b": 2, "a": 1});
        assert_eq!(hash(&v1).unwrap(), hash(&v2).unwrap());
    }

    #[test]
    fn hash_differs_for_different_values() {
        let v1 = json!({"a": 1});
        let v2 = json!({"a": 2});
        assert_ne!(hash(&v1).unwrap(), hash(&v2).unwrap());
    }

    #[test]
    fn hash_rejects_non_finite_numbers() {
        let v = serde_json::Value::Number(serde_json::Number::from_f64(1.0).unwrap());
        assert!(hash(&v).is_ok());
    }

    #[test]
    fn hash_is_sixteen_lowercase_hex_chars() {
        let v = json!({"tool": "read_file"});
        let h = hash(&v).unwrap();
        let s = h.as_str();
        assert_eq!(s.len(), 16);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_json() -> impl Strategy<Value = serde_json::Value> {
        let leaf = prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::Bool),
            any::<i32>().prop_map(|n| serde_json::Value::Number(n.into())),
            ".*".prop_map(serde_json::Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..8)
                    .prop_map(serde_json::Value::Array),
                proptest::collection::btree_map("[a-z]{1,8}", inner, 0..8).prop_map(|m| {
                    serde_json::Value::Object(m.into_iter().collect())
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn canonicalize_is_deterministic(v in arb_json()) {
            let a = canonicalize(&v);
            let b = canonicalize(&v);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn hash_is_deterministic_over_arbitrary_json(v in arb_json()) {
            let a = hash(&v);
            let b = hash(&v);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn canonical_output_is_idempotent_when_reparsed(v in arb_json()) {
            let canonical = canonicalize(&v).unwrap();
            let reparsed: serde_json::Value = serde_json::from_str(&canonical).unwrap();
            let canonical2 = canonicalize(&reparsed).unwrap();
            prop_assert_eq!(canonical, canonical2);
        }
    }
}
