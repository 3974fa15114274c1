use std::sync::LazyLock;

use regex::Regex;

use super::checker::{CONTENT_MAX_LENGTH, CONTENT_MIN_LENGTH};
use super::english::ascii_word_edges;
use crate::models::{IssueType, QualityIssue};
use crate::utils::{FULL_STOP, char_len, collapse_trailing_full_stops, ensure_full_stop, take_chars};

static DETERMINER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(these|this|that|the)\s*").expect("determiner pattern is valid")
});

static TRAILING_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[、，,\s]+$").expect("separator pattern is valid"));

static TRAILING_ELLIPSIS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:など|等)?(?:\.{3,}|…+)$").expect("ellipsis pattern is valid")
});

static TRAILING_PARTICLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:から|まで|より|けど|ので|ため|して|を|が|に|で|と|は|の|や)$")
        .expect("particle pattern is valid")
});

fn japanese_determiner(word: &str) -> &'static str {
    match word.to_ascii_lowercase().as_str() {
        "these" => "これらの",
        "this" => "この",
        "that" => "その",
        _ => "",
    }
}

/// Swaps bare English determiners for their Japanese counterparts.
fn replace_determiners(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in DETERMINER_RE.captures_iter(text) {
        let (Some(whole), Some(word)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if !ascii_word_edges(text, word.start(), word.end()) {
            continue;
        }
        out.push_str(&text[last..whole.start()]);
        out.push_str(japanese_determiner(word.as_str()));
        last = whole.end();
    }
    out.push_str(&text[last..]);
    out
}

fn strip_truncation(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = TRAILING_ELLIPSIS_RE.replace(&current, "");
        let next = TRAILING_SEPARATOR_RE.replace(&next, "").into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    TRAILING_PARTICLE_RE.replace(&current, "").into_owned()
}

/// Cuts an over-long summary at the last sentence end between 80 and 120
/// characters, or hard-truncates to 117 characters plus `。`.
fn shorten(text: &str) -> String {
    if char_len(text) <= CONTENT_MAX_LENGTH {
        return text.to_string();
    }
    let mut cut = None;
    for (count, (idx, c)) in text.char_indices().enumerate() {
        let chars_through = count + 1;
        if chars_through > CONTENT_MAX_LENGTH {
            break;
        }
        if c == FULL_STOP && chars_through >= CONTENT_MIN_LENGTH {
            cut = Some(idx + c.len_utf8());
        }
    }
    match cut {
        Some(end) => text[..end].to_string(),
        None => format!("{}{FULL_STOP}", take_chars(text, CONTENT_MAX_LENGTH - 3)),
    }
}

/// Applies rule-based repairs for the given issues.
///
/// Best effort only: the result should be checked again.
pub fn fix_summary(summary: &str, issues: &[QualityIssue]) -> String {
    let has = |kind: IssueType| issues.iter().any(|i| i.issue_type == kind);
    let mut text = summary.trim().to_string();

    if has(IssueType::LanguageMix) {
        text = replace_determiners(&text);
    }
    if has(IssueType::Truncation) {
        text = strip_truncation(&text);
    }
    if has(IssueType::Length) {
        text = shorten(&text);
    }
    if has(IssueType::Truncation) || has(IssueType::Format) {
        text = ensure_full_stop(&text);
    }

    collapse_trailing_full_stops(&text)
}
