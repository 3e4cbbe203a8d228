//! Schema-evolution tracking: the history of inferred response schemas
//! across successive probe runs, and their stability over time.

use crate::error::FingerprintError;
use crate::models::{ResponseSchemaEvolution, SchemaHistoryEntry};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

const MAX_HISTORY: usize = 16;
const STABILITY_WINDOW: usize = 5;

/// Advances a response-schema history with a newly observed inferred
/// schema, returning the updated [`ResponseSchemaEvolution`].
///
/// `history` is ordered oldest-first; the caller is expected to persist
/// and pass back the returned value's `history` on the next call.
pub fn update_evolution(
    mut history: Vec<SchemaHistoryEntry>,
    new_schema: Value,
    observed_at: DateTime<Utc>,
    sample_count: u32,
    inconsistent_fields: Vec<String>,
) -> Result<ResponseSchemaEvolution, FingerprintError> {
    let current_hash = drift_hash::hash(&new_schema)?;

    history.push(SchemaHistoryEntry {
        hash: current_hash.clone(),
        schema: new_schema,
        observed_at,
        sample_count,
    });
    if history.len() > MAX_HISTORY {
        let excess = history.len() - MAX_HISTORY;
        history.drain(0..excess);
    }

    let window_len = STABILITY_WINDOW.min(history.len());
    let window = &history[history.len() - window_len..];
    let is_stable = window.iter().all(|e| e.hash == current_hash);

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in &history {
        *counts.entry(entry.hash.as_str()).or_insert(0) += 1;
    }
    let max_count = counts.values().copied().max().unwrap_or(0);
    let stability_confidence = if history.is_empty() { 0.0 } else { max_count as f64 / history.len() as f64 };

    let mut fields = inconsistent_fields;
    fields.sort();
    fields.dedup();

    Ok(ResponseSchemaEvolution {
        current_hash,
        history,
        is_stable,
        stability_confidence,
        inconsistent_fields: fields,
        sample_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc)
    }

    #[test]
    fn first_observation_is_stable() {
        let evolution = update_evolution(vec![], json!({"type": "string"}), now(), 3, vec![]).unwrap();
        assert!(evolution.is_stable);
        assert_eq!(evolution.history.len(), 1);
        assert_eq!(evolution.stability_confidence, 1.0);
    }

    #[test]
    fn history_is_bounded_to_sixteen_entries() {
        let mut history = Vec::new();
        for i in 0..20 {
            let evolution =
                update_evolution(history, json!({"type": "string", "v": i}), now(), 1, vec![]).unwrap();
            history = evolution.history;
        }
        assert_eq!(history.len(), 16);
    }

    #[test]
    fn differing_recent_schema_is_unstable() {
        let evolution = update_evolution(vec![], json!({"type": "string"}), now(), 1, vec![]).unwrap();
        let evolution =
            update_evolution(evolution.history, json!({"type": "number"}), now(), 1, vec![]).unwrap();
        assert!(evolution.stability_confidence < 1.0);
    }
}
