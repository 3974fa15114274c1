use tracing::debug;

use crate::models::{IssueType, QualityCheckResult, QualityIssue, Severity};
use crate::utils::{FULL_STOP, bullet_body, char_len, content_lines};

/// Bullets a detailed summary must have.
pub const REQUIRED_BULLETS: usize = 5;

const SUMMARY_TOO_SHORT: usize = 50;
const SUMMARY_SHORT: usize = 90;
const SUMMARY_SLIGHTLY_LONG: usize = 180;
const SUMMARY_TOO_LONG: usize = 200;

const BULLET_MIN_LENGTH: usize = 80;
const BULLET_MAX_LENGTH: usize = 130;

const DETAILED_TOO_SHORT: usize = 250;
const DETAILED_SHORT: usize = 400;
const DETAILED_SLIGHTLY_LONG: usize = 700;
const DETAILED_TOO_LONG: usize = 800;

struct Penalties {
    critical: i32,
    major: i32,
    minor: i32,
    summary_too_short: i32,
}

static PENALTIES: Penalties = Penalties {
    critical: 40,
    major: 20,
    minor: 5,
    summary_too_short: 35,
};

/// Running score and issue list for one check.
struct Rubric {
    score: i32,
    issues: Vec<QualityIssue>,
}

impl Rubric {
    fn new() -> Self {
        Self {
            score: 100,
            issues: Vec::new(),
        }
    }

    fn flag(&mut self, issue: QualityIssue) {
        let penalty = match issue.severity {
            Severity::Critical => PENALTIES.critical,
            Severity::Major => PENALTIES.major,
            Severity::Minor => PENALTIES.minor,
        };
        self.flag_with(issue, penalty);
    }

    fn flag_with(&mut self, issue: QualityIssue, penalty: i32) {
        self.score -= penalty;
        self.issues.push(issue);
    }

    fn finish(self) -> QualityCheckResult {
        QualityCheckResult::from_issues(self.score, self.issues)
    }
}

fn check_summary(rubric: &mut Rubric, summary: &str) {
    let len = char_len(summary);

    if len < SUMMARY_TOO_SHORT {
        rubric.flag_with(
            QualityIssue::new(
                IssueType::Length,
                Severity::Major,
                format!("要約が短すぎます（{len}文字、推奨170文字前後）"),
            ),
            PENALTIES.summary_too_short,
        );
    } else if len < SUMMARY_SHORT {
        rubric.flag(QualityIssue::new(
            IssueType::Length,
            Severity::Minor,
            format!("要約がやや短めです（{len}文字、推奨170文字前後）"),
        ));
    } else if len > SUMMARY_TOO_LONG {
        rubric.flag(QualityIssue::new(
            IssueType::Length,
            Severity::Major,
            format!("要約が長すぎます（{len}文字、最大{SUMMARY_TOO_LONG}文字）"),
        ));
    } else if len > SUMMARY_SLIGHTLY_LONG {
        rubric.flag(QualityIssue::new(
            IssueType::Length,
            Severity::Minor,
            format!("要約がやや長めです（{len}文字、推奨170文字前後）"),
        ));
    }

    if !summary.ends_with(FULL_STOP) {
        rubric.flag(QualityIssue::new(
            IssueType::Punctuation,
            Severity::Minor,
            "要約が句点（。）で終わっていません",
        ));
    }
}

fn check_detailed(rubric: &mut Rubric, detailed: &str) {
    let lines = content_lines(detailed);
    let bullets: Vec<&str> = lines.iter().filter_map(|line| bullet_body(line)).collect();

    if bullets.len() != REQUIRED_BULLETS {
        rubric.flag(QualityIssue::new(
            IssueType::Format,
            Severity::Critical,
            format!(
                "詳細要約の箇条書きが{}個（必須{REQUIRED_BULLETS}個）です",
                bullets.len()
            ),
        ));
    }

    if bullets.len() < lines.len() {
        rubric.flag(QualityIssue::new(
            IssueType::Format,
            Severity::Major,
            "詳細要約に箇条書き以外の行が含まれています",
        ));
    }

    for (i, bullet) in bullets.iter().enumerate() {
        let len = char_len(bullet);
        if !(BULLET_MIN_LENGTH..=BULLET_MAX_LENGTH).contains(&len) {
            rubric.flag(QualityIssue::new(
                IssueType::Format,
                Severity::Minor,
                format!(
                    "{}番目の箇条書きの文字数が不適切です（{len}文字、推奨{BULLET_MIN_LENGTH}〜{BULLET_MAX_LENGTH}文字）",
                    i + 1
                ),
            ));
        }
        if bullet.ends_with(FULL_STOP) {
            rubric.flag(QualityIssue::new(
                IssueType::Punctuation,
                Severity::Minor,
                format!("{}番目の箇条書きが句点（。）で終わっています", i + 1),
            ));
        }
    }

    let total: usize = bullets.iter().map(|b| char_len(b)).sum();
    let band = if total < DETAILED_TOO_SHORT {
        Some((Severity::Major, "短すぎます"))
    } else if total < DETAILED_SHORT {
        Some((Severity::Minor, "やや短めです"))
    } else if total > DETAILED_TOO_LONG {
        Some((Severity::Major, "長すぎます"))
    } else if total > DETAILED_SLIGHTLY_LONG {
        Some((Severity::Minor, "やや長めです"))
    } else {
        None
    };
    if let Some((severity, verdict)) = band {
        rubric.flag(QualityIssue::new(
            IssueType::Length,
            severity,
            format!("詳細要約が{verdict}（合計{total}文字、推奨500文字前後）"),
        ));
    }
}

/// Scores a summary and its detailed bullet list against the house rubric.
///
/// The score starts at 100 and loses points per issue by severity. A
/// detailed summary without exactly five bullets is a critical issue and
/// always requires regeneration.
///
/// # Examples
///
/// ```
/// use sumqc::quality::check_summary_quality;
///
/// let result = check_summary_quality("短い。", "・一つだけ");
/// assert!(result.requires_regeneration);
/// assert!(result.issues.iter().any(|i| i.message.contains("箇条書きが1個（必須5個）")));
/// ```
pub fn check_summary_quality(summary: &str, detailed_summary: &str) -> QualityCheckResult {
    let mut rubric = Rubric::new();
    check_summary(&mut rubric, summary.trim());
    check_detailed(&mut rubric, detailed_summary);

    let result = rubric.finish();
    debug!(
        score = result.score,
        issues = result.issues.len(),
        requires_regeneration = result.requires_regeneration,
        "summary quality checked"
    );
    result
}
