use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::english::check_english_mixing;
use crate::models::{
    ContentQualityCheckResult, IssueType, MixSeverity, QUALITY_THRESHOLD, QualityIssue, Severity,
};
use crate::utils::{FULL_STOP, bullet_body, char_len, content_lines};

pub const CONTENT_MIN_LENGTH: usize = 80;
pub const CONTENT_MAX_LENGTH: usize = 120;

const LENGTH_PENALTY: i32 = 20;
const TRUNCATION_PENALTY: i32 = 30;
const THIN_CONTENT_PENALTY: i32 = 30;
const FORMAT_PENALTY: i32 = 10;

fn language_mix_penalty(severity: MixSeverity) -> i32 {
    match severity {
        MixSeverity::Critical => 30,
        MixSeverity::Major => 20,
        MixSeverity::Minor => 10,
        MixSeverity::None => 0,
    }
}

/// Endings that suggest the text was cut off.
static TRUNCATION_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> =
    LazyLock::new(|| {
        [
            (r"[、，,]$", "読点で終わっている"),
            (
                r"(?:を|が|に|で|と|は|の|や|から|まで|より|けど|ので|ため|して)$",
                "助詞・接続表現で終わっている",
            ),
            (r"(?:など|等)?(?:\.{3}|…+)$", "省略記号で終わっている"),
        ]
        .into_iter()
        .map(|(p, d)| (Regex::new(p).expect("truncation pattern is valid"), d))
        .collect()
    });

static BOILERPLATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^(?:この|本)記事(?:は|では)",
        r"について(?:の記事|解説した記事|紹介した記事)(?:です)?。?$",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("boilerplate pattern is valid"))
    .collect()
});

static TECHNICAL_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"実装|設計|開発|構築|性能|パフォーマンス|アルゴリズム|アーキテクチャ|フレームワーク|ライブラリ|データベース|サーバー|クラウド|コード|最適化|セキュリティ|テスト|デプロイ|並行|非同期|脆弱性|認証",
    )
    .expect("technical marker pattern is valid")
});

static SPECIFICITY_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9０-９]|[A-Z][a-z]+[A-Z]|[A-Za-z]+\.[A-Za-z]+")
        .expect("specificity marker pattern is valid")
});

/// Returns the description of the first truncation signature `text` ends with.
fn truncation_signature(text: &str) -> Option<&'static str> {
    TRUNCATION_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, description)| *description)
}

fn is_thin(summary: &str, title: Option<&str>, has_allowed_terms: bool) -> bool {
    if BOILERPLATE_PATTERNS.iter().any(|p| p.is_match(summary)) {
        return true;
    }
    if let Some(title) = title.map(str::trim).filter(|t| !t.is_empty())
        && summary.trim_end_matches(FULL_STOP) == title.trim_end_matches(FULL_STOP)
    {
        return true;
    }
    let technical = has_allowed_terms || TECHNICAL_MARKER.is_match(summary);
    let specific = SPECIFICITY_MARKER.is_match(summary);
    !technical && !specific
}

/// Scores a summary with content heuristics.
///
/// Starts from 100 and subtracts per issue found: length outside 80..=120
/// characters, truncation, thin content, English mixing and a missing
/// closing `。`. The score is clamped to `0..=100`.
///
/// When a detailed summary is given, its last line is also checked for
/// truncation. A title, when given, flags summaries that merely repeat it.
pub fn check_content_quality(
    summary: &str,
    detailed_summary: Option<&str>,
    title: Option<&str>,
) -> ContentQualityCheckResult {
    let text = summary.trim();
    let mut issues = Vec::new();
    let mut score = 100;

    let len = char_len(text);
    if !(CONTENT_MIN_LENGTH..=CONTENT_MAX_LENGTH).contains(&len) {
        issues.push(QualityIssue::new(
            IssueType::Length,
            Severity::Major,
            format!(
                "要約の文字数が範囲外です（{len}文字、推奨{CONTENT_MIN_LENGTH}〜{CONTENT_MAX_LENGTH}文字）"
            ),
        ));
        score -= LENGTH_PENALTY;
    }

    if let Some(signature) = truncation_signature(text) {
        issues.push(
            QualityIssue::new(
                IssueType::Truncation,
                Severity::Critical,
                "要約が途中で切れている可能性があります",
            )
            .with_details(serde_json::json!({ "pattern": signature })),
        );
        score -= TRUNCATION_PENALTY;
    }

    if let Some(detailed) = detailed_summary
        && let Some(last) = content_lines(detailed).last().copied()
        && let Some(signature) = truncation_signature(bullet_body(last).unwrap_or(last))
    {
        issues.push(
            QualityIssue::new(
                IssueType::Truncation,
                Severity::Critical,
                "詳細要約が途中で切れている可能性があります",
            )
            .with_details(serde_json::json!({ "pattern": signature })),
        );
        score -= TRUNCATION_PENALTY;
    }

    let english = check_english_mixing(text);

    if is_thin(text, title, !english.allowed_terms.is_empty()) {
        issues.push(QualityIssue::new(
            IssueType::ThinContent,
            Severity::Major,
            "要約の内容が薄い、または定型的です",
        ));
        score -= THIN_CONTENT_PENALTY;
    }

    if let Some(severity) = english.severity.as_issue_severity() {
        score -= language_mix_penalty(english.severity);
        let details = serde_json::to_value(&english).unwrap_or_default();
        issues.push(
            QualityIssue::new(
                IssueType::LanguageMix,
                severity,
                format!(
                    "英語と日本語が不自然に混在しています（{}）",
                    english.problematic_phrases.join("、")
                ),
            )
            .with_details(details),
        );
    }

    if !text.ends_with(FULL_STOP) {
        issues.push(QualityIssue::new(
            IssueType::Format,
            Severity::Minor,
            "要約が句点（。）で終わっていません",
        ));
        score -= FORMAT_PENALTY;
    }

    let score = score.clamp(0, 100);
    let critical: Vec<&str> = issues
        .iter()
        .filter(|i| i.severity == Severity::Critical)
        .map(|i| i.message.as_str())
        .collect();
    let requires_regeneration = score < QUALITY_THRESHOLD || !critical.is_empty();

    let regeneration_reason = if !critical.is_empty() {
        Some(critical.join(", "))
    } else if score < QUALITY_THRESHOLD {
        let major: Vec<&str> = issues
            .iter()
            .filter(|i| i.severity == Severity::Major)
            .map(|i| i.message.as_str())
            .collect();
        (!major.is_empty()).then(|| major.join(", "))
    } else {
        None
    };

    debug!(score, issues = issues.len(), requires_regeneration, "content quality checked");

    ContentQualityCheckResult {
        is_valid: score >= QUALITY_THRESHOLD,
        issues,
        score,
        requires_regeneration,
        regeneration_reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 114 characters with technical terms and a figure.
    const GOOD: &str = "Rustの非同期ランタイムTokioを使ってWebサーバーを構築する手順を解説する。リクエスト処理の並行化やコネクション管理の工夫により、従来の同期実装と比べてスループットが約3倍に向上した結果をベンチマークとともに示している。";

    fn types(result: &ContentQualityCheckResult) -> Vec<IssueType> {
        result.issues.iter().map(|i| i.issue_type).collect()
    }

    #[test]
    fn good_summary_scores_full_marks() {
        let result = check_content_quality(GOOD, None, None);
        assert_eq!(result.score, 100, "{:?}", result.issues);
        assert!(result.is_valid);
        assert!(!result.requires_regeneration);
        assert!(result.regeneration_reason.is_none());
    }

    #[test]
    fn length_outside_band_is_major() {
        let short = "Rustの所有権の仕組みを3つの例で説明する。";
        let result = check_content_quality(short, None, None);

        assert_eq!(types(&result), vec![IssueType::Length]);
        assert_eq!(result.issues[0].severity, Severity::Major);
        assert_eq!(result.score, 80);
        assert!(result.is_valid);
    }

    #[test]
    fn trailing_comma_is_critical_truncation() {
        let text = format!("{}、", GOOD.trim_end_matches('。'));
        let result = check_content_quality(&text, None, None);

        assert!(types(&result).contains(&IssueType::Truncation));
        assert!(result.requires_regeneration);
        assert!(
            result
                .regeneration_reason
                .as_deref()
                .is_some_and(|r| r.contains("途中で切れて"))
        );
    }

    #[test]
    fn trailing_ellipsis_is_truncation() {
        let result = check_content_quality("RustとGoの性能を比較など...", None, None);
        assert!(types(&result).contains(&IssueType::Truncation));
    }

    #[test]
    fn truncated_detailed_summary_is_reported() {
        let detailed = "・Tokioの基本構成を説明\n・非同期処理の性能を計測し、";
        let result = check_content_quality(GOOD, Some(detailed), None);

        assert_eq!(types(&result), vec![IssueType::Truncation]);
        assert_eq!(result.score, 70);
        assert!(result.requires_regeneration);
    }

    #[test]
    fn boilerplate_opening_is_thin() {
        let text = format!("この記事では{GOOD}");
        let result = check_content_quality(&text, None, None);
        assert!(types(&result).contains(&IssueType::ThinContent));
    }

    #[test]
    fn unspecific_text_is_thin() {
        let text = "とても便利な方法が紹介されていて、読むと参考になる内容がたくさんあるので、多くの人にとって役に立つと思われる記事になっている。ぜひ一度読んでみることをおすすめしたい。";
        let result = check_content_quality(text, None, None);
        assert!(types(&result).contains(&IssueType::ThinContent));
    }

    #[test]
    fn summary_repeating_title_is_thin() {
        let title = "Rust製Webサーバーの性能改善を3倍にした話";
        let result = check_content_quality(&format!("{title}。"), None, Some(title));
        assert!(types(&result).contains(&IssueType::ThinContent));
    }

    #[test]
    fn language_mix_carries_details() {
        let text = format!("This ランタイムで{GOOD}");
        let result = check_content_quality(&text, None, None);

        let issue = result
            .issues
            .iter()
            .find(|i| i.issue_type == IssueType::LanguageMix)
            .expect("language mix issue");
        assert_eq!(issue.severity, Severity::Critical);
        let details = issue.details.as_ref().expect("details");
        assert_eq!(details["severity"], "critical");
        assert!(
            details["allowedTerms"]
                .as_array()
                .is_some_and(|terms| terms.iter().any(|t| t == "Rust"))
        );
        assert!(result.requires_regeneration);
    }

    #[test]
    fn missing_full_stop_is_minor_format() {
        let text = GOOD.trim_end_matches('。');
        let result = check_content_quality(text, None, None);

        assert_eq!(types(&result), vec![IssueType::Format]);
        assert_eq!(result.score, 90);
        assert!(!result.requires_regeneration);
    }

    #[test]
    fn score_is_clamped_at_zero() {
        let result = check_content_quality("This 記事は、", None, None);
        assert_eq!(result.score, 0);
        assert!(!result.is_valid);
        assert!(result.requires_regeneration);
    }

    #[test]
    fn major_issues_explain_low_scores() {
        // length and thin content, no critical issue
        let result = check_content_quality("とても良い記事だった。", None, None);
        assert!(result.score < QUALITY_THRESHOLD);
        let reason = result.regeneration_reason.expect("reason");
        assert!(reason.contains("文字数"));
        assert!(reason.contains("内容が薄い"));
    }
}
