//! Latency percentile, variability, and confidence-tier computation.

use crate::models::{ConfidenceLevel, PerformanceConfidence, PerformanceStats};
use crate::sample::LatencySample;

/// Linear-interpolation percentile over a pre-sorted slice, `p` in `[0,1]`.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn population_std_dev(values: &[f64], avg: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn confidence_level(sample_count: u32, cv: f64) -> ConfidenceLevel {
    if sample_count >= 10 && cv <= 0.25 {
        ConfidenceLevel::High
    } else if sample_count >= 5 && cv <= 0.5 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

/// Computes latency percentiles, success rate, and a confidence tier for
/// one tool's batch of latency samples.
pub fn compute_performance(samples: &[LatencySample]) -> PerformanceStats {
    let total = samples.len() as u32;
    let successful: Vec<f64> = samples.iter().filter(|s| s.success).map(|s| s.duration_ms).collect();
    let successful_count = successful.len() as u32;

    let mut sorted = successful.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let avg = mean(&sorted);
    let std_dev = population_std_dev(&sorted, avg);
    let cv = if avg > 0.0 { std_dev / avg } else { 0.0 };

    let validation_samples =
        samples.iter().filter(|s| s.expected_outcome.is_some() && s.outcome_correct.is_some()).count() as u32;

    let success_rate = if total == 0 { 0.0 } else { successful_count as f64 / total as f64 };

    PerformanceStats {
        p50_ms: percentile(&sorted, 0.5),
        p95_ms: percentile(&sorted, 0.95),
        p99_ms: percentile(&sorted, 0.99),
        avg_ms: avg,
        min_ms: sorted.first().copied().unwrap_or(0.0),
        max_ms: sorted.last().copied().unwrap_or(0.0),
        std_dev_ms: std_dev,
        success_rate,
        confidence: PerformanceConfidence {
            sample_count: successful_count,
            successful_samples: successful_count,
            validation_samples,
            total_tests: total,
            standard_deviation: std_dev,
            coefficient_of_variation: cv,
            confidence_level: confidence_level(successful_count, cv),
        },
    }
}

/// A detected regression or improvement between two successive p50
/// measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionResult {
    pub regression_percent: f64,
    pub is_regression: bool,
    pub is_improvement: bool,
    pub is_reliable: bool,
}

/// Compares previous and current p50 latency, flagging a regression when
/// the increase exceeds `threshold` (default 0.10) and an improvement
/// when the decrease exceeds 0.05. A regression is reliable only when the
/// current measurement has medium or high confidence.
pub fn detect_regression(
    previous_p50: f64,
    current_p50: f64,
    current_confidence: ConfidenceLevel,
    threshold: f64,
) -> RegressionResult {
    let regression_percent = if previous_p50 > 0.0 { (current_p50 - previous_p50) / previous_p50 } else { 0.0 };
    let is_regression = regression_percent > threshold;
    let is_improvement = regression_percent < -0.05;
    let is_reliable = is_regression
        && matches!(current_confidence, ConfidenceLevel::Medium | ConfidenceLevel::High);

    RegressionResult { regression_percent, is_regression, is_improvement, is_reliable }
}
