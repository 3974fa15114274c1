use serde::{Deserialize, Serialize};

use super::QualityIssue;

/// Score at or above which a summary counts as valid.
pub const QUALITY_THRESHOLD: i32 = 70;

/// Verdict of the orchestrating summary quality checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCheckResult {
    pub score: i32,
    pub is_valid: bool,
    pub issues: Vec<QualityIssue>,
    pub requires_regeneration: bool,
}

impl QualityCheckResult {
    /// Builds a verdict from a raw score and the issues that produced it.
    ///
    /// The score is clamped to `0..=100`. Regeneration is required when the
    /// score is below threshold or any issue is critical.
    pub fn from_issues(raw_score: i32, issues: Vec<QualityIssue>) -> Self {
        let score = raw_score.clamp(0, 100);
        let has_critical = issues.iter().any(QualityIssue::is_critical);
        Self {
            score,
            is_valid: score >= QUALITY_THRESHOLD,
            requires_regeneration: score < QUALITY_THRESHOLD || has_critical,
            issues,
        }
    }
}

/// Verdict of the content quality checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentQualityCheckResult {
    pub is_valid: bool,
    pub issues: Vec<QualityIssue>,
    pub score: i32,
    pub requires_regeneration: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regeneration_reason: Option<String>,
}

/// Aggregate figures over many quality verdicts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityStats {
    pub average_score: f64,
    pub valid_count: usize,
    pub invalid_count: usize,
    /// Percentage (0-100) of verdicts requiring regeneration, rounded.
    pub regeneration_rate: u32,
    pub minor_issues_count: usize,
    pub major_issues_count: usize,
    pub critical_issues_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IssueType, Severity};

    #[test]
    fn from_issues_clamps_negative_scores() {
        let result = QualityCheckResult::from_issues(-25, Vec::new());
        assert_eq!(result.score, 0);
        assert!(!result.is_valid);
        assert!(result.requires_regeneration);
    }

    #[test]
    fn critical_issue_forces_regeneration_above_threshold() {
        let issue = QualityIssue::new(IssueType::Format, Severity::Critical, "bad");
        let result = QualityCheckResult::from_issues(90, vec![issue]);

        assert!(result.is_valid);
        assert!(result.requires_regeneration);
    }

    #[test]
    fn threshold_score_is_valid() {
        let result = QualityCheckResult::from_issues(70, Vec::new());
        assert!(result.is_valid);
        assert!(!result.requires_regeneration);

        let result = QualityCheckResult::from_issues(69, Vec::new());
        assert!(!result.is_valid);
        assert!(result.requires_regeneration);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let result = QualityCheckResult::from_issues(100, Vec::new());
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["isValid"], true);
        assert_eq!(value["requiresRegeneration"], false);
    }
}
