//! Batch scoring of stored summaries.
//!
//! Records are read from a JSON array or JSON Lines file and scored in
//! parallel. Every check is a pure function of its record, so the work
//! is spread over the rayon pool without locking.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::QualityConfig;
use crate::content::{check_content_quality, fix_summary};
use crate::models::{ContentQualityCheckResult, QualityCheckResult, QualityStats};
use crate::quality::{calculate_quality_stats, check_summary_quality};
use crate::tags::{CategorizedTags, TagNormalizer, categorize_multiple_tags, validate_and_normalize_tags};
use crate::validator::auto_fix_summary;

/// Errors that can occur while loading batch input.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The input file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be decoded
    #[error("invalid record on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The input held no records
    #[error("no records found in {}", .0.display())]
    Empty(PathBuf),
}

/// A stored article summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub summary: String,
    #[serde(default, alias = "detailed_summary")]
    pub detailed_summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Verdicts and cleaned tags for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub quality: QualityCheckResult,
    pub content: ContentQualityCheckResult,
    pub tags: Vec<String>,
    pub categories: CategorizedTags,
    /// Whether the quality score reaches the configured minimum.
    pub acceptable: bool,
}

/// Loads summary records from a JSON array or JSON Lines file.
///
/// Blank lines in JSON Lines input are skipped. Line numbers in errors are
/// 1-based; for array input the whole document counts as line 1.
///
/// # Errors
///
/// Returns [`BatchError::Io`] if the file cannot be read,
/// [`BatchError::Json`] if a record is malformed and [`BatchError::Empty`]
/// if no records are present.
pub fn load_records(path: &Path) -> Result<Vec<SummaryRecord>, BatchError> {
    let content = fs::read_to_string(path).map_err(|source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<SummaryRecord> = if content.trim_start().starts_with('[') {
        serde_json::from_str(&content).map_err(|source| BatchError::Json { line: 1, source })?
    } else {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|source| BatchError::Json {
                    line: idx + 1,
                    source,
                })
            })
            .collect::<Result<_, _>>()?
    };

    if records.is_empty() {
        return Err(BatchError::Empty(path.to_path_buf()));
    }

    debug!(path = %path.display(), records = records.len(), "records loaded");
    Ok(records)
}

fn score_record(record: &SummaryRecord, config: &QualityConfig) -> ScoredRecord {
    let quality = check_summary_quality(&record.summary, &record.detailed_summary);
    let content = check_content_quality(
        &record.summary,
        Some(record.detailed_summary.as_str()).filter(|d| !d.trim().is_empty()),
        record.title.as_deref(),
    );
    let tags = validate_and_normalize_tags(TagNormalizer::normalize_tags(&record.tags));
    let categories = categorize_multiple_tags(&tags);

    ScoredRecord {
        id: record.id.clone(),
        acceptable: config.accepts(quality.score),
        quality,
        content,
        tags,
        categories,
    }
}

/// Scores every record in parallel. Output order matches input order.
pub fn score_records(records: &[SummaryRecord], config: &QualityConfig) -> Vec<ScoredRecord> {
    info!(records = records.len(), "scoring batch");

    let scored: Vec<ScoredRecord> = records
        .par_iter()
        .map(|record| score_record(record, config))
        .collect();

    let acceptable = scored.iter().filter(|s| s.acceptable).count();
    info!(acceptable, total = scored.len(), "batch scored");
    scored
}

/// Aggregates the orchestrator verdicts of a scored batch.
pub fn summarize_batch(scored: &[ScoredRecord]) -> QualityStats {
    let results: Vec<QualityCheckResult> = scored.iter().map(|s| s.quality.clone()).collect();
    calculate_quality_stats(&results)
}

/// Repairs each record's summary.
///
/// Runs the structural cleanup first, then the rule-based fixes for
/// whatever the content check still finds.
pub fn fix_records(records: &[SummaryRecord]) -> Vec<SummaryRecord> {
    records
        .par_iter()
        .map(|record| {
            let cleaned = auto_fix_summary(&record.summary);
            let detailed = Some(record.detailed_summary.as_str()).filter(|d| !d.trim().is_empty());
            let verdict = check_content_quality(&cleaned, detailed, record.title.as_deref());
            SummaryRecord {
                summary: fix_summary(&cleaned, &verdict.issues),
                ..record.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_input(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn record(id: &str, summary_len: usize, bullets: usize) -> SummaryRecord {
        SummaryRecord {
            id: Some(id.to_string()),
            title: None,
            summary: format!("{}。", "あ".repeat(summary_len - 1)),
            detailed_summary: (0..bullets)
                .map(|_| format!("・{}", "い".repeat(100)))
                .collect::<Vec<_>>()
                .join("\n"),
            tags: Vec::new(),
        }
    }

    #[test]
    fn loads_json_array() {
        let file = write_input(
            r#"[{"id":"a","summary":"要約。","detailedSummary":"・一","tags":["rust"]},
                {"summary":"二つ目。"}]"#,
        );
        let records = load_records(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_deref(), Some("a"));
        assert_eq!(records[0].detailed_summary, "・一");
        assert_eq!(records[1].detailed_summary, "");
        assert!(records[1].tags.is_empty());
    }

    #[test]
    fn loads_json_lines_skipping_blanks() {
        let file = write_input(
            "{\"summary\":\"一。\"}\n\n{\"summary\":\"二。\",\"detailed_summary\":\"・二\"}\n",
        );
        let records = load_records(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].detailed_summary, "・二");
    }

    #[test]
    fn reports_line_of_bad_record() {
        let file = write_input("{\"summary\":\"一。\"}\n{not json}\n");
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, BatchError::Json { line: 2, .. }));
    }

    #[test]
    fn empty_input_is_an_error() {
        let file = write_input("  \n");
        assert!(matches!(load_records(file.path()), Err(BatchError::Empty(_))));

        let file = write_input("[]");
        assert!(matches!(load_records(file.path()), Err(BatchError::Empty(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, BatchError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn scoring_preserves_order() {
        let records: Vec<_> = (0..50)
            .map(|i| record(&i.to_string(), 170, if i % 2 == 0 { 5 } else { 3 }))
            .collect();
        let scored = score_records(&records, &QualityConfig::default());

        for (i, s) in scored.iter().enumerate() {
            assert_eq!(s.id.as_deref(), Some(i.to_string().as_str()));
            assert_eq!(s.acceptable, i % 2 == 0);
        }
    }

    #[test]
    fn acceptability_follows_configured_minimum() {
        let records = vec![record("a", 60, 5)];
        let strict = QualityConfig {
            min_score: 96,
            ..QualityConfig::default()
        };

        assert!(score_records(&records, &QualityConfig::default())[0].acceptable);
        assert!(!score_records(&records, &strict)[0].acceptable);
    }

    #[test]
    fn tags_are_normalized_capped_and_categorized() {
        let mut r = record("a", 170, 5);
        r.tags = ["js", "JavaScript", "k8s", "react", "docker", "postgres", "aws"]
            .map(String::from)
            .to_vec();
        let scored = &score_records(&[r], &QualityConfig::default())[0];

        assert_eq!(
            scored.tags,
            vec!["JavaScript", "Kubernetes", "React", "Docker", "PostgreSQL"]
        );
        assert!(scored.categories.uncategorized.is_empty());
    }

    #[test]
    fn batch_stats() {
        let records = vec![record("a", 170, 5), record("b", 170, 3)];
        let stats = summarize_batch(&score_records(&records, &QualityConfig::default()));

        assert_eq!(stats.valid_count, 1);
        assert_eq!(stats.invalid_count, 1);
        assert_eq!(stats.regeneration_rate, 50);
        assert_eq!(stats.critical_issues_count, 1);
    }

    #[test]
    fn fix_records_repairs_summaries() {
        let records = vec![SummaryRecord {
            id: None,
            title: None,
            summary: "要約：この記事では非同期処理を解説する、".to_string(),
            detailed_summary: String::new(),
            tags: Vec::new(),
        }];
        let fixed = fix_records(&records);
        assert_eq!(fixed[0].summary, "非同期処理を解説する。");
    }
}
