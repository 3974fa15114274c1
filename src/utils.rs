//! Shared text helpers used by every checker.
//!
//! All lengths are counted in Unicode scalar values, so a kanji and an
//! ASCII letter each count as one character.

/// Japanese full stop terminating summaries.
pub const FULL_STOP: char = '。';

/// Bullet marker that starts each line of a detailed summary.
pub const BULLET: char = '・';

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Returns the first `n` characters of `text`.
pub fn take_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Appends a full stop unless the text is empty or already ends with one.
pub fn ensure_full_stop(text: &str) -> String {
    if text.is_empty() || text.ends_with(FULL_STOP) {
        text.to_string()
    } else {
        format!("{text}{FULL_STOP}")
    }
}

/// Collapses a run of trailing full stops into a single one.
pub fn collapse_trailing_full_stops(text: &str) -> String {
    let stripped = text.trim_end_matches(FULL_STOP);
    if stripped.len() == text.len() {
        text.to_string()
    } else {
        format!("{stripped}{FULL_STOP}")
    }
}

/// Non-empty, trimmed lines of `text`.
pub fn content_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Strips the bullet marker from a line, if present.
pub fn bullet_body(line: &str) -> Option<&str> {
    line.strip_prefix(BULLET).map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_len_counts_scalars_not_bytes() {
        assert_eq!(char_len("要約"), 2);
        assert_eq!(char_len("Rust"), 4);
        assert_eq!(char_len(""), 0);
    }

    #[test]
    fn take_chars_respects_boundaries() {
        assert_eq!(take_chars("あいうえお", 3), "あいう");
        assert_eq!(take_chars("abc", 10), "abc");
        assert_eq!(take_chars("abc", 0), "");
    }

    #[test]
    fn ensure_full_stop_never_duplicates() {
        assert_eq!(ensure_full_stop("要約です"), "要約です。");
        assert_eq!(ensure_full_stop("要約です。"), "要約です。");
        assert_eq!(ensure_full_stop(""), "");
    }

    #[test]
    fn collapse_trailing_full_stops_keeps_one() {
        assert_eq!(collapse_trailing_full_stops("完了。。。"), "完了。");
        assert_eq!(collapse_trailing_full_stops("完了。"), "完了。");
        assert_eq!(collapse_trailing_full_stops("完了"), "完了");
    }

    #[test]
    fn content_lines_drops_blank_lines() {
        let lines = content_lines("・一\n\n  ・二  \n   \n");
        assert_eq!(lines, vec!["・一", "・二"]);
    }

    #[test]
    fn bullet_body_strips_marker() {
        assert_eq!(bullet_body("・ 項目"), Some("項目"));
        assert_eq!(bullet_body("項目"), None);
    }
}
