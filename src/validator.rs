//! Structural validation and cleanup of generated summaries.
//!
//! This is the strict pass/fail gate: it reports human-readable errors
//! and warnings but no numeric score. The scoring rubric lives in
//! [`crate::quality`] and uses its own length bands.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ValidationResult;
use crate::utils::{
    BULLET, FULL_STOP, bullet_body, char_len, collapse_trailing_full_stops, content_lines,
    ensure_full_stop,
};

pub const SUMMARY_MIN_LENGTH: usize = 90;
pub const SUMMARY_MAX_LENGTH: usize = 130;
pub const DETAILED_MIN_BULLETS: usize = 3;
pub const DETAILED_RECOMMENDED_BULLETS: usize = 6;
pub const DETAILED_RECOMMENDED_LENGTH: usize = 300;

/// Labels a model sometimes prepends to its answer.
static FORBIDDEN_LABELS: &[&str] = &[
    "詳細要約:",
    "詳細要約：",
    "要約:",
    "要約：",
    "概要:",
    "概要：",
    "まとめ:",
    "まとめ：",
    "Summary:",
    "Summary：",
    "summary:",
    "summary：",
    "SUMMARY:",
    "SUMMARY：",
];

/// Boilerplate lead-ins that add nothing to a summary.
static BOILERPLATE_PREFIXES: &[&str] = &[
    "この記事では",
    "この記事は",
    "本記事では",
    "本記事は",
    "本稿では",
    "今回は",
];

/// Signatures of text that was cut off and resumed mid-sentence.
static INCOMPLETE_ENDINGS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // a sentence made of one kanji: "…を解説。説。"
        r"(?:^|[。、])\p{Han}。",
        // a verb stem closed early, then more text: "…を実装し。その…"
        r"\p{Han}(?:し|て|され|でき)。[^。\s]",
        // a particle with nothing after it
        r"[をがにとは]。",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("incomplete-ending pattern is valid"))
    .collect()
});

/// Trailing fragments removed by [`auto_fix_summary`], with replacements.
static TRAILING_FRAGMENTS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"[、，,\s]+$", ""),
        (r"(?:など|等)?(?:…+|\.{2,})$", ""),
        (r"。\p{Han}$", "。"),
    ]
    .into_iter()
    .map(|(p, r)| (Regex::new(p).expect("trailing-fragment pattern is valid"), r))
    .collect()
});

static HORIZONTAL_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("whitespace pattern is valid"));

/// Kind of article a summary describes, used for keyword hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArticleType {
    Release,
    ProblemSolving,
    Tutorial,
    TechIntro,
    Implementation,
    General,
}

impl ArticleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::ProblemSolving => "problem-solving",
            Self::Tutorial => "tutorial",
            Self::TechIntro => "tech-intro",
            Self::Implementation => "implementation",
            Self::General => "general",
        }
    }

    /// Words a summary of this type is expected to contain at least one of.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Release => &["リリース", "バージョン", "新機能", "発表", "公開", "アップデート"],
            Self::ProblemSolving => &["問題", "解決", "原因", "エラー", "対処", "修正"],
            Self::Tutorial => &["手順", "方法", "設定", "導入", "ステップ", "使い方"],
            Self::TechIntro => &["特徴", "概要", "仕組み", "メリット", "紹介"],
            Self::Implementation => &["実装", "コード", "構築", "開発", "設計"],
            Self::General => &[],
        }
    }
}

impl fmt::Display for ArticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown article type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown article type: {0}")]
pub struct ParseArticleTypeError(pub String);

impl FromStr for ArticleType {
    type Err = ParseArticleTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "release" => Ok(Self::Release),
            "problem-solving" => Ok(Self::ProblemSolving),
            "tutorial" => Ok(Self::Tutorial),
            "tech-intro" => Ok(Self::TechIntro),
            "implementation" => Ok(Self::Implementation),
            "general" => Ok(Self::General),
            _ => Err(ParseArticleTypeError(s.to_string())),
        }
    }
}

fn leading_label(text: &str) -> Option<&'static str> {
    FORBIDDEN_LABELS
        .iter()
        .copied()
        .find(|label| text.starts_with(label))
}

fn leading_boilerplate(text: &str) -> Option<&'static str> {
    BOILERPLATE_PREFIXES
        .iter()
        .copied()
        .find(|prefix| text.starts_with(prefix))
}

/// Validates a short list summary.
///
/// Every rule is checked and all errors are returned together, except for
/// empty input which short-circuits.
///
/// # Examples
///
/// ```
/// use sumqc::validator::validate_summary;
///
/// let result = validate_summary("短い要約。");
/// assert!(!result.is_valid);
/// assert!(result.errors[0].contains("最低90文字必要"));
/// ```
pub fn validate_summary(text: &str) -> ValidationResult {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ValidationResult::new(vec!["要約が空です".to_string()], Vec::new());
    }

    let mut errors = Vec::new();
    let len = char_len(trimmed);

    if len < SUMMARY_MIN_LENGTH {
        errors.push(format!(
            "要約が短すぎます（{len}文字、最低{SUMMARY_MIN_LENGTH}文字必要）"
        ));
    }
    if len > SUMMARY_MAX_LENGTH {
        errors.push(format!(
            "要約が長すぎます（{len}文字、最大{SUMMARY_MAX_LENGTH}文字まで）"
        ));
    }
    if !trimmed.ends_with(FULL_STOP) {
        errors.push("要約が句点（。）で終わっていません".to_string());
    }
    if trimmed.contains(['\n', '\r']) {
        errors.push("要約に改行が含まれています".to_string());
    }
    if let Some(label) = leading_label(trimmed) {
        errors.push(format!("不要なラベル「{label}」が含まれています"));
    }
    if let Some(prefix) = leading_boilerplate(trimmed) {
        errors.push(format!("定型的な書き出し「{prefix}」で始まっています"));
    }
    for pattern in INCOMPLETE_ENDINGS.iter() {
        for m in pattern.find_iter(trimmed) {
            errors.push(format!("不完全な文末表現が含まれています: 「{}」", m.as_str()));
        }
    }

    ValidationResult::new(errors, Vec::new())
}

/// Validates a bulleted detailed summary.
///
/// Fewer than three bullets is an error. Fewer than the recommended count,
/// or a short overall body, only produces warnings. There is no upper bound
/// on bullet count or bullet length.
pub fn validate_detailed_summary(text: &str) -> ValidationResult {
    let lines = content_lines(text);
    if lines.is_empty() {
        return ValidationResult::new(vec!["詳細要約が空です".to_string()], Vec::new());
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let bodies: Vec<&str> = lines.iter().filter_map(|line| bullet_body(line)).collect();
    let non_bullets = lines.len() - bodies.len();

    if non_bullets > 0 {
        errors.push(format!(
            "箇条書き形式（{BULLET}）ではない行があります（{non_bullets}行）"
        ));
    }
    if bodies.len() < DETAILED_MIN_BULLETS {
        errors.push(format!(
            "箇条書きが少なすぎます（{}個、最低{DETAILED_MIN_BULLETS}個必要）",
            bodies.len()
        ));
    } else if bodies.len() < DETAILED_RECOMMENDED_BULLETS {
        warnings.push(format!(
            "箇条書きは{DETAILED_RECOMMENDED_BULLETS}個以上を推奨します（現在{}個）",
            bodies.len()
        ));
    }

    let total: usize = bodies.iter().map(|body| char_len(body)).sum();
    if total < DETAILED_RECOMMENDED_LENGTH {
        warnings.push(format!("詳細要約が短い可能性があります（{total}文字）"));
    }

    ValidationResult::new(errors, warnings)
}

/// Runs [`validate_summary`] and adds a warning when none of the article
/// type's keywords appear.
pub fn validate_by_article_type(text: &str, article_type: ArticleType) -> ValidationResult {
    let mut result = validate_summary(text);
    let keywords = article_type.keywords();

    if !keywords.is_empty() && !keywords.iter().any(|k| text.contains(k)) {
        result.push_warning(format!(
            "記事タイプ「{article_type}」に典型的なキーワード（{}）が含まれていません",
            keywords.join("、")
        ));
    }
    result
}

/// Strips leading labels (repeatedly), trims, and collapses runs of spaces
/// and tabs.
///
/// # Examples
///
/// ```
/// use sumqc::validator::cleanup_summary;
///
/// assert_eq!(cleanup_summary("要約：Summary: これは記事の要約です。"), "これは記事の要約です。");
/// ```
pub fn cleanup_summary(text: &str) -> String {
    let mut rest = text.trim();
    while let Some(label) = leading_label(rest) {
        rest = rest[label.len()..].trim_start();
    }
    HORIZONTAL_WHITESPACE
        .replace_all(rest, " ")
        .trim()
        .to_string()
}

/// Repairs the common defects of a generated summary.
///
/// Cleans labels, drops boilerplate lead-ins, removes trailing
/// incomplete fragments and terminates with a single `。`. Empty input
/// stays empty. Applying the function twice gives the same result.
///
/// # Examples
///
/// ```
/// use sumqc::validator::auto_fix_summary;
///
/// assert_eq!(auto_fix_summary("これは記事の要約です"), "これは記事の要約です。");
/// assert_eq!(auto_fix_summary(""), "");
/// ```
pub fn auto_fix_summary(text: &str) -> String {
    let mut fixed = cleanup_summary(text);
    while let Some(prefix) = leading_boilerplate(&fixed) {
        fixed = cleanup_summary(fixed[prefix.len()..].trim_start_matches(['、', ' ', '　']));
    }

    loop {
        let before = fixed.len();
        for (pattern, replacement) in TRAILING_FRAGMENTS.iter() {
            fixed = pattern.replace(&fixed, *replacement).into_owned();
        }
        if fixed.len() == before {
            break;
        }
    }

    collapse_trailing_full_stops(&ensure_full_stop(&fixed))
}
