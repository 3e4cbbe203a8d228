//! Aggregate reporters: pure post-hoc summaries over the per-tool data in
//! two baselines. Each report is built independently of the behavior
//! change list and is included in the diff only when its source data
//! exists on at least one side.

use crate::models::{
    Aspect, BehaviorChange, DocumentationScoreReport, ErrorTrendReport, PerformanceRegressionReport,
    SchemaEvolutionReport, SecurityDiffReport,
};
use crate::ComparatorOptions;
use drift_baseline::Severity;
use drift_baseline::{Baseline, RiskLevel};
use drift_fingerprint::{detect_regression, ConfidenceLevel, ErrorCategory};
use std::collections::BTreeMap;

fn matched_tool_names<'a>(previous: &'a Baseline, current: &'a Baseline) -> Vec<&'a str> {
    previous
        .capabilities
        .tools
        .iter()
        .map(|t| t.name.as_str())
        .filter(|name| current.tool(name).is_some())
        .collect()
}

pub fn build_performance_report(
    previous: &Baseline,
    current: &Baseline,
    options: &ComparatorOptions,
) -> Option<PerformanceRegressionReport> {
    let mut any_data = false;
    let mut regressions = Vec::new();
    let mut improvements = 0usize;
    let mut confidence_changes = Vec::new();
    let mut low_confidence_tools = Vec::new();

    for name in matched_tool_names(previous, current) {
        if !options.tool_allowed(name) {
            continue;
        }
        let prev_tool = previous.tool(name).unwrap();
        let curr_tool = current.tool(name).unwrap();

        let (Some(prev_p50), Some(curr_p50)) = (prev_tool.baseline_p50_ms, curr_tool.baseline_p50_ms) else {
            continue;
        };
        any_data = true;

        let curr_confidence = curr_tool
            .performance_confidence
            .as_ref()
            .map(|c| c.confidence_level)
            .unwrap_or(ConfidenceLevel::Low);

        let result = detect_regression(prev_p50, curr_p50, curr_confidence, options.performance_threshold);
        if result.is_regression {
            regressions.push(name.to_string());
        } else if result.is_improvement {
            improvements += 1;
        }

        if let (Some(prev_conf), Some(curr_conf)) =
            (&prev_tool.performance_confidence, &curr_tool.performance_confidence)
        {
            if prev_conf.confidence_level != curr_conf.confidence_level {
                confidence_changes.push(name.to_string());
            }
        }

        if curr_confidence == ConfidenceLevel::Low {
            low_confidence_tools.push(name.to_string());
        }
    }

    if !any_data {
        return None;
    }

    regressions.sort();
    confidence_changes.sort();
    low_confidence_tools.sort();
    let has_regressions = !regressions.is_empty();

    Some(PerformanceRegressionReport {
        regressions,
        improvements,
        confidence_changes,
        low_confidence_tools,
        has_regressions,
    })
}

fn risk_score_average(baseline: &Baseline) -> Option<f64> {
    let scores: Vec<f64> = baseline
        .capabilities
        .tools
        .iter()
        .filter_map(|t| t.security_fingerprint.as_ref())
        .filter(|f| f.tested)
        .map(|f| f.risk_score as f64)
        .collect();
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

pub fn build_security_report(previous: &Baseline, current: &Baseline) -> Option<SecurityDiffReport> {
    let prev_avg = risk_score_average(previous);
    let curr_avg = risk_score_average(current);
    if prev_avg.is_none() && curr_avg.is_none() {
        return None;
    }

    let mut prev_keys = std::collections::BTreeSet::new();
    for tool in &previous.capabilities.tools {
        if let Some(fp) = &tool.security_fingerprint {
            for f in &fp.findings {
                prev_keys.insert((tool.name.clone(), f.category.clone(), f.cwe_id.clone(), f.parameter.clone()));
            }
        }
    }
    let mut curr_keys = std::collections::BTreeSet::new();
    for tool in &current.capabilities.tools {
        if let Some(fp) = &tool.security_fingerprint {
            for f in &fp.findings {
                curr_keys.insert((tool.name.clone(), f.category.clone(), f.cwe_id.clone(), f.parameter.clone()));
            }
        }
    }

    let new_findings = curr_keys.difference(&prev_keys).count();
    let resolved_findings = prev_keys.difference(&curr_keys).count();
    let previous_risk_score = prev_avg.unwrap_or(0.0);
    let current_risk_score = curr_avg.unwrap_or(0.0);
    let degraded = new_findings > 0 || current_risk_score > previous_risk_score;

    Some(SecurityDiffReport { new_findings, resolved_findings, previous_risk_score, current_risk_score, degraded })
}

pub fn build_schema_evolution_report(
    previous: &Baseline,
    current: &Baseline,
    behavior_changes: &[BehaviorChange],
) -> Option<SchemaEvolutionReport> {
    let mut any_data = false;
    let mut stable_count = 0usize;
    let mut unstable_count = 0usize;
    let mut structure_changed_count = 0usize;

    for tool in &current.capabilities.tools {
        let Some(curr_evo) = &tool.response_schema_evolution else { continue };
        any_data = true;
        if curr_evo.is_stable {
            stable_count += 1;
        } else {
            unstable_count += 1;
        }

        if let Some(prev_tool) = previous.tool(&tool.name) {
            if let Some(prev_evo) = &prev_tool.response_schema_evolution {
                if prev_evo.current_hash != curr_evo.current_hash {
                    structure_changed_count += 1;
                }
            }
        }
    }

    if !any_data {
        return None;
    }

    let has_breaking_changes = behavior_changes
        .iter()
        .any(|c| c.aspect == Aspect::ResponseSchemaEvolution && c.severity == Severity::Breaking);

    Some(SchemaEvolutionReport { stable_count, unstable_count, structure_changed_count, has_breaking_changes })
}

fn category_key(tool: &str, category: ErrorCategory) -> (String, String) {
    (tool.to_string(), format!("{:?}", category))
}

fn category_counts(baseline: &Baseline) -> BTreeMap<(String, String), u32> {
    let mut counts = BTreeMap::new();
    for tool in &baseline.capabilities.tools {
        let Some(patterns) = &tool.error_patterns else { continue };
        for pattern in patterns {
            *counts.entry(category_key(&tool.name, pattern.category)).or_insert(0) += pattern.count;
        }
    }
    counts
}

pub fn build_error_trend_report(previous: &Baseline, current: &Baseline) -> Option<ErrorTrendReport> {
    let prev_counts = category_counts(previous);
    let curr_counts = category_counts(current);
    if prev_counts.is_empty() && curr_counts.is_empty() {
        return None;
    }

    let mut new_categories = Vec::new();
    let mut increasing_categories = Vec::new();
    for (key, curr_count) in &curr_counts {
        match prev_counts.get(key) {
            None => new_categories.push(format!("{}:{}", key.0, key.1)),
            Some(prev_count) if *prev_count > 0 && (*curr_count as f64) >= 2.0 * (*prev_count as f64) => {
                increasing_categories.push(format!("{}:{}", key.0, key.1))
            }
            _ => {}
        }
    }

    let mut resolved_categories = Vec::new();
    for key in prev_counts.keys() {
        if !curr_counts.contains_key(key) {
            resolved_categories.push(format!("{}:{}", key.0, key.1));
        }
    }

    new_categories.sort();
    resolved_categories.sort();
    increasing_categories.sort();

    Some(ErrorTrendReport { new_categories, resolved_categories, increasing_categories })
}

pub fn build_documentation_score_report(
    previous: &Baseline,
    current: &Baseline,
) -> Option<DocumentationScoreReport> {
    let (prev_score, curr_score) =
        previous.documentation_score.as_ref().zip(current.documentation_score.as_ref())?;
    let improved = curr_score.overall_score > prev_score.overall_score;
    let degraded = curr_score.overall_score < prev_score.overall_score;
    Some(DocumentationScoreReport {
        improved,
        degraded,
        previous_grade: format!("{:?}", prev_score.grade),
        current_grade: format!("{:?}", curr_score.grade),
    })
}

pub fn risk_level_rank(level: RiskLevel) -> u8 {
    level as u8
}
