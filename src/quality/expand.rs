use tracing::debug;

use crate::utils::{FULL_STOP, char_len, collapse_trailing_full_stops, ensure_full_stop};

/// Summaries at least this long are returned untouched.
pub const EXPANSION_THRESHOLD: usize = 50;

/// Shortest lead sentence worth borrowing from the article body.
const MIN_LEAD_SENTENCE: usize = 10;

fn lead_sentence(content: &str) -> Option<&str> {
    content
        .split(|c| matches!(c, FULL_STOP | '！' | '？' | '!' | '?' | '\n'))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .filter(|s| char_len(s) >= MIN_LEAD_SENTENCE)
}

/// Pads a very short summary with material from the article.
///
/// Summaries of [`EXPANSION_THRESHOLD`] characters or more are returned
/// unchanged. Shorter ones get the first sentence of `content` appended
/// until `min_length` is reached, then `"{title}に関する記事。"` if still
/// short. The result ends with `。` unless every input was empty.
///
/// # Examples
///
/// ```
/// use sumqc::quality::expand_summary_if_needed;
///
/// let expanded = expand_summary_if_needed("入門記事", "Tokio入門", 20, "");
/// assert_eq!(expanded, "入門記事。Tokio入門に関する記事。");
/// ```
pub fn expand_summary_if_needed(
    summary: &str,
    title: &str,
    min_length: usize,
    content: &str,
) -> String {
    let base = summary.trim();
    if char_len(base) >= EXPANSION_THRESHOLD {
        return summary.to_string();
    }

    let mut text = ensure_full_stop(base);

    if char_len(&text) < min_length
        && let Some(lead) = lead_sentence(content)
        && !text.contains(lead)
    {
        text.push_str(&ensure_full_stop(lead));
    }

    let title = title.trim();
    if char_len(&text) < min_length && !title.is_empty() {
        text.push_str(title.trim_end_matches(FULL_STOP));
        text.push_str("に関する記事。");
    }

    let text = collapse_trailing_full_stops(&text);
    debug!(
        from = char_len(base),
        to = char_len(&text),
        "summary expanded"
    );
    text
}
