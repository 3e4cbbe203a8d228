//! Structural diff of JSON-Schema-like documents.
//!
//! Schemas are modeled directly as [`serde_json::Value`] rather than a
//! strongly typed schema struct: the comparator only ever reads a fixed
//! set of known keywords (`type`, `properties`, `required`, `items`,
//! `enum`, `const`, `minimum`, `maximum`, `exclusiveMinimum`,
//! `exclusiveMaximum`, `minLength`, `maxLength`, `pattern`, `format`,
//! `default`, `description`, `additionalProperties`, `oneOf`, `anyOf`,
//! `allOf`) and treats everything else as an opaque extension keyword
//! compared by deep equality. This mirrors the flexibility JSON Schema
//! itself has and avoids forcing every caller's schema dialect through a
//! rigid Rust type.
//!
//! The comparator never errors: a malformed or partial schema just
//! produces fewer, coarser changes. It does not hash or canonicalize —
//! that concern belongs to `drift-hash`, kept out of this crate so a
//! schema-only comparison never needs a digest.

mod compare;
mod keys;

pub use compare::compare_schemas;

use serde::{Deserialize, Serialize};

/// One structural difference between two schema trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaChange {
    /// Dotted, JSON-pointer-flavored path to the differing node, e.g.
    /// `$.properties.location.minLength`.
    pub path: String,
    /// The kind of structural change observed.
    pub kind: ChangeKind,
    /// Textual rendering of the prior value, if any.
    pub before: Option<String>,
    /// Textual rendering of the new value, if any.
    pub after: Option<String>,
    /// Whether this change is compatibility-breaking for existing callers.
    pub breaking: bool,
    /// Human-readable description of the change.
    pub description: String,
}

/// Classification of a single [`SchemaChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    PropertyAdded,
    PropertyRemoved,
    RequiredAdded,
    RequiredRemoved,
    TypeChanged,
    EnumValueAdded,
    EnumValueRemoved,
    ConstTightened,
    NumericConstraintTightened,
    NumericConstraintRelaxed,
    StringConstraintTightened,
    StringConstraintRelaxed,
    PatternChanged,
    FormatChanged,
    DefaultChanged,
    DescriptionChanged,
    AdditionalPropertiesTightened,
    AdditionalPropertiesRelaxed,
    BranchAdded,
    BranchRemoved,
    UnknownKeyDivergence,
}
