//! Documentation quality scoring for tool descriptions and parameter docs.

use crate::models::{DocumentationIssue, DocumentationScore, Grade, ToolDocInput, ToolDocumentationReport};

const MIN_GOOD_DESCRIPTION_LEN: usize = 20;

fn description_coverage(input: &ToolDocInput) -> f64 {
    match &input.description {
        Some(d) if !d.trim().is_empty() => 100.0,
        _ => 0.0,
    }
}

fn description_quality(input: &ToolDocInput) -> f64 {
    match &input.description {
        Some(d) => {
            let len = d.trim().len();
            if len == 0 {
                0.0
            } else if len < MIN_GOOD_DESCRIPTION_LEN {
                50.0
            } else {
                100.0
            }
        }
        None => 0.0,
    }
}

fn parameter_documentation(input: &ToolDocInput) -> f64 {
    if input.parameter_descriptions.is_empty() {
        return 100.0;
    }
    let documented =
        input.parameter_descriptions.values().filter(|d| d.as_ref().is_some_and(|s| !s.trim().is_empty())).count();
    documented as f64 / input.parameter_descriptions.len() as f64 * 100.0
}

fn example_coverage(input: &ToolDocInput) -> f64 {
    if input.has_examples {
        100.0
    } else {
        0.0
    }
}

/// Scores one tool's documentation, returning its weighted component
/// score and any deficiency issues.
pub fn score_tool(input: &ToolDocInput) -> ToolDocumentationReport {
    let description_coverage = description_coverage(input);
    let description_quality = description_quality(input);
    let parameter_documentation = parameter_documentation(input);
    let example_coverage = example_coverage(input);

    let score = description_coverage * 0.25
        + description_quality * 0.25
        + parameter_documentation * 0.30
        + example_coverage * 0.20;

    let mut issues = Vec::new();
    if description_coverage < 100.0 {
        issues.push(DocumentationIssue {
            tool: input.name.clone(),
            message: "missing description".to_string(),
            suggestion: "add a one-sentence description of what this tool does".to_string(),
        });
    } else if description_quality < 100.0 {
        issues.push(DocumentationIssue {
            tool: input.name.clone(),
            message: "description is too short to be useful".to_string(),
            suggestion: format!("expand the description to at least {MIN_GOOD_DESCRIPTION_LEN} characters"),
        });
    }
    if parameter_documentation < 100.0 {
        issues.push(DocumentationIssue {
            tool: input.name.clone(),
            message: "one or more parameters lack a description".to_string(),
            suggestion: "document every parameter's purpose and expected values".to_string(),
        });
    }
    if !input.has_examples {
        issues.push(DocumentationIssue {
            tool: input.name.clone(),
            message: "no usage examples".to_string(),
            suggestion: "add at least one example invocation".to_string(),
        });
    }

    ToolDocumentationReport {
        tool: input.name.clone(),
        description_coverage,
        description_quality,
        parameter_documentation,
        example_coverage,
        score,
        issues,
    }
}

/// Scores documentation across every tool, producing the aggregate
/// [`DocumentationScore`] persisted on a baseline plus the per-tool
/// reports consumed by the comparator and callers that want detail.
pub fn score_documentation(inputs: &[ToolDocInput]) -> (DocumentationScore, Vec<ToolDocumentationReport>) {
    if inputs.is_empty() {
        return (
            DocumentationScore { overall_score: 0.0, grade: Grade::F, issue_count: 0, tool_count: 0 },
            Vec::new(),
        );
    }

    let reports: Vec<ToolDocumentationReport> = inputs.iter().map(score_tool).collect();
    let overall_score = reports.iter().map(|r| r.score).sum::<f64>() / reports.len() as f64;
    let issue_count = reports.iter().map(|r| r.issues.len() as u32).sum();

    (
        DocumentationScore {
            overall_score,
            grade: Grade::from_score(overall_score),
            issue_count,
            tool_count: inputs.len() as u32,
        },
        reports,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn fully_documented() -> ToolDocInput {
        let mut params = BTreeMap::new();
        params.insert("location".to_string(), Some("the city to look up".to_string()));
        ToolDocInput {
            name: "get_weather".to_string(),
            description: Some("Fetches the current weather for a named location.".to_string()),
            parameter_descriptions: params,
            has_examples: true,
        }
    }

    #[test]
    fn fully_documented_tool_scores_perfectly() {
        let report = score_tool(&fully_documented());
        assert!((report.score - 100.0).abs() < 1e-9);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn missing_description_loses_half_the_weight() {
        let mut input = fully_documented();
        input.description = None;
        let report = score_tool(&input);
        assert!(report.score < 100.0);
        assert!(report.issues.iter().any(|i| i.message.contains("description")));
    }

    #[test]
    fn grade_boundaries_match_spec() {
        assert_eq!(Grade::from_score(90.0), Grade::A);
        assert_eq!(Grade::from_score(89.9), Grade::B);
        assert_eq!(Grade::from_score(80.0), Grade::B);
        assert_eq!(Grade::from_score(70.0), Grade::C);
        assert_eq!(Grade::from_score(60.0), Grade::D);
        assert_eq!(Grade::from_score(59.9), Grade::F);
    }

    #[test]
    fn overall_score_averages_across_tools() {
        let good = fully_documented();
        let mut bad = fully_documented();
        bad.description = None;
        bad.has_examples = false;
        let (score, reports) = score_documentation(&[good, bad]);
        assert_eq!(reports.len(), 2);
        assert_eq!(score.tool_count, 2);
        assert!(score.overall_score < 100.0 && score.overall_score > 0.0);
    }
}
