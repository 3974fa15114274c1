use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::{IssueType, QualityIssue};
use crate::utils::take_chars;

/// Characters of article body included in a regeneration prompt.
pub const PROMPT_CONTENT_LIMIT: usize = 3000;

const PROMPT_TEMPLATE: &str = r#"あなたは技術記事の要約を作成するアシスタントです。以下の記事について、日本語で要約を作成してください。

必須ルール:
1. 要約は80〜120文字の1段落で、改行を含めない
2. 文末は必ず句点（。）で終える
3. 「この記事では」「本記事は」などの定型的な書き出しを使わない
4. 技術用語、製品名、数値など記事固有の具体的な情報を含める
5. 英語の文法表現を混ぜない（技術用語はそのまま使ってよい）

前回の要約で見つかった問題:
{instructions}
{allowed_terms}
タイトル: {title}

本文:
{content}

要約のみを出力してください。

要約:"#;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(instructions|allowed_terms|title|content)\}")
        .expect("placeholder pattern is valid")
});

fn instruction(issue_type: IssueType) -> &'static str {
    match issue_type {
        IssueType::Length => "文字数を80〜120文字に収めてください",
        IssueType::Format => "文末を句点（。）で終え、1段落で書いてください",
        IssueType::Punctuation => "句読点の使い方を見直してください",
        IssueType::Truncation => "文を途中で切らず、最後まで書き切ってください",
        IssueType::ThinContent => {
            "記事の具体的な内容（技術名、数値、結果など）を盛り込んでください"
        }
        IssueType::LanguageMix => {
            "英語の文法表現を使わず、自然な日本語の文にしてください"
        }
    }
}

/// Technical terms reported by the language-mix check, if any.
fn allowed_terms(issues: &[QualityIssue]) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    let reported = issues
        .iter()
        .filter(|i| i.issue_type == IssueType::LanguageMix)
        .filter_map(|i| i.details.as_ref())
        .filter_map(|d| d.get("allowedTerms").and_then(|t| t.as_array()))
        .flatten()
        .filter_map(|t| t.as_str());
    for term in reported {
        if !terms.iter().any(|t| t == term) {
            terms.push(term.to_string());
        }
    }
    terms
}

/// Builds the prompt for regenerating a summary that failed the content check.
///
/// Each issue type contributes one corrective instruction. Technical terms
/// found by the language-mix check are listed as safe to keep. The article
/// body is cut to [`PROMPT_CONTENT_LIMIT`] characters.
///
/// # Examples
///
/// ```
/// use sumqc::content::create_enhanced_prompt;
/// use sumqc::models::{IssueType, QualityIssue, Severity};
///
/// let issues = [QualityIssue::new(IssueType::Length, Severity::Major, "too short")];
/// let prompt = create_enhanced_prompt("Tokio入門", "本文", &issues);
/// assert!(prompt.contains("タイトル: Tokio入門"));
/// assert!(prompt.contains("80〜120文字に収めて"));
/// ```
pub fn create_enhanced_prompt(title: &str, content: &str, issues: &[QualityIssue]) -> String {
    let mut seen: Vec<IssueType> = Vec::new();
    for issue in issues {
        if !seen.contains(&issue.issue_type) {
            seen.push(issue.issue_type);
        }
    }
    let instructions = if seen.is_empty() {
        "- 特になし".to_string()
    } else {
        seen.iter()
            .map(|t| format!("- {}", instruction(*t)))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let terms = allowed_terms(issues);
    let allowed = if terms.is_empty() {
        String::new()
    } else {
        format!("\n使用してよい技術用語: {}\n", terms.join(", "))
    };

    let content = take_chars(content.trim(), PROMPT_CONTENT_LIMIT);

    // Single pass: braces in the title or body stay literal.
    PLACEHOLDER_RE
        .replace_all(PROMPT_TEMPLATE, |caps: &Captures| match &caps[1] {
            "instructions" => instructions.clone(),
            "allowed_terms" => allowed.clone(),
            "title" => title.trim().to_string(),
            _ => content.to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    #[test]
    fn one_instruction_per_issue_type() {
        let issues = [
            QualityIssue::new(IssueType::Truncation, Severity::Critical, "a"),
            QualityIssue::new(IssueType::Truncation, Severity::Critical, "b"),
            QualityIssue::new(IssueType::ThinContent, Severity::Major, "c"),
        ];
        let prompt = create_enhanced_prompt("タイトル", "本文", &issues);

        assert_eq!(prompt.matches("最後まで書き切って").count(), 1);
        assert!(prompt.contains("具体的な内容"));
        assert!(!prompt.contains("特になし"));
    }

    #[test]
    fn no_issues_says_so() {
        let prompt = create_enhanced_prompt("タイトル", "本文", &[]);
        assert!(prompt.contains("- 特になし"));
        assert!(!prompt.contains("使用してよい技術用語"));
    }

    #[test]
    fn allowed_terms_come_from_language_mix_details() {
        let details = serde_json::json!({
            "hasProblematicEnglish": true,
            "problematicPhrases": [],
            "allowedTerms": ["Rust", "Tokio"],
            "severity": "major",
        });
        let issues = [
            QualityIssue::new(IssueType::LanguageMix, Severity::Major, "mix").with_details(details),
        ];
        let prompt = create_enhanced_prompt("タイトル", "本文", &issues);
        assert!(prompt.contains("使用してよい技術用語: Rust, Tokio"));
    }

    #[test]
    fn braces_in_title_and_body_are_left_alone() {
        let prompt = create_enhanced_prompt("{content}の罠", "本文に{title}と書く", &[]);

        assert!(prompt.contains("タイトル: {content}の罠"));
        assert!(prompt.contains("本文に{title}と書く"));
        assert_eq!(prompt.matches("本文に").count(), 1);
    }

    #[test]
    fn content_is_limited() {
        let content = "鮭".repeat(PROMPT_CONTENT_LIMIT + 500);
        let prompt = create_enhanced_prompt("タイトル", &content, &[]);
        assert_eq!(prompt.matches('鮭').count(), PROMPT_CONTENT_LIMIT);
    }
}
