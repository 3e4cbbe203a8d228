//! Protocol version feature gating.
//!
//! A change on a gated aspect is suppressed iff either baseline's
//! protocol version is below the gate. Versions are date strings
//! (`YYYY-MM-DD`) and compare lexicographically, which coincides with
//! chronological order for this format.

pub const GATE_ANNOTATIONS: &str = "2025-03-26";
pub const GATE_OUTPUT_SCHEMA: &str = "2025-06-18";
pub const GATE_TASK_SUPPORT: &str = "2025-11-25";

/// True if `version` meets or exceeds `gate`.
pub fn meets_gate(version: &str, gate: &str) -> bool {
    version >= gate
}

/// True if the aspect should be suppressed because either side predates
/// the gate.
pub fn is_gated_out(previous_version: &str, current_version: &str, gate: &str) -> bool {
    !meets_gate(previous_version, gate) || !meets_gate(current_version, gate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_date_compare_orders_correctly() {
        assert!(meets_gate("2025-06-18", GATE_ANNOTATIONS));
        assert!(!meets_gate("2024-11-05", GATE_ANNOTATIONS));
        assert!(meets_gate("2025-11-25", GATE_TASK_SUPPORT));
    }

    #[test]
    fn gated_out_when_either_side_predates_gate() {
        assert!(is_gated_out("2024-11-05", "2025-06-18", GATE_ANNOTATIONS));
        assert!(is_gated_out("2025-06-18", "2024-11-05", GATE_ANNOTATIONS));
        assert!(!is_gated_out("2025-06-18", "2025-11-25", GATE_ANNOTATIONS));
    }
}
