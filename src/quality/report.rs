use std::fmt::Write;

use crate::models::QualityCheckResult;

/// Renders a verdict as a short markdown report.
///
/// The issue section is only present when there are issues.
///
/// # Examples
///
/// ```
/// use sumqc::models::QualityCheckResult;
/// use sumqc::quality::generate_quality_report;
///
/// let report = generate_quality_report(&QualityCheckResult::from_issues(100, vec![]));
/// assert!(report.contains("スコア: 100/100"));
/// assert!(!report.contains("### 問題点"));
/// ```
pub fn generate_quality_report(result: &QualityCheckResult) -> String {
    let mut out = String::from("## 要約品質レポート\n\n");

    // Writing to a String cannot fail.
    let _ = writeln!(out, "スコア: {}/100", result.score);
    let verdict = if result.is_valid {
        "✅ 合格"
    } else {
        "❌ 不合格"
    };
    let _ = writeln!(out, "判定: {verdict}");
    let regeneration = if result.requires_regeneration {
        "必要"
    } else {
        "不要"
    };
    let _ = writeln!(out, "再生成: {regeneration}");

    if !result.issues.is_empty() {
        out.push_str("\n### 問題点\n\n");
        for issue in &result.issues {
            let _ = writeln!(
                out,
                "- {} [{}] {}",
                issue.severity.glyph(),
                issue.severity,
                issue.message
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IssueType, QualityIssue, Severity};

    #[test]
    fn passing_report() {
        let report = generate_quality_report(&QualityCheckResult::from_issues(100, vec![]));
        assert_eq!(
            report,
            "## 要約品質レポート\n\nスコア: 100/100\n判定: ✅ 合格\n再生成: 不要\n"
        );
    }

    #[test]
    fn failing_report_lists_issues_with_glyphs() {
        let issues = vec![
            QualityIssue::new(IssueType::Format, Severity::Critical, "箇条書きが3個"),
            QualityIssue::new(IssueType::Length, Severity::Major, "長すぎます"),
            QualityIssue::new(IssueType::Punctuation, Severity::Minor, "句点なし"),
        ];
        let report = generate_quality_report(&QualityCheckResult::from_issues(35, issues));

        assert!(report.contains("スコア: 35/100"));
        assert!(report.contains("判定: ❌ 不合格"));
        assert!(report.contains("再生成: 必要"));
        assert!(report.contains("- 🔴 [critical] 箇条書きが3個"));
        assert!(report.contains("- 🟡 [major] 長すぎます"));
        assert!(report.contains("- 🔵 [minor] 句点なし"));
    }

    #[test]
    fn valid_but_critical_report() {
        let issues = vec![QualityIssue::new(IssueType::Format, Severity::Critical, "x")];
        let report = generate_quality_report(&QualityCheckResult::from_issues(80, issues));
        assert!(report.contains("判定: ✅ 合格"));
        assert!(report.contains("再生成: 必要"));
    }
}
