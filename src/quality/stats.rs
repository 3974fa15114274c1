use crate::models::{QualityCheckResult, QualityStats, Severity};

/// Aggregates verdicts into summary figures.
///
/// An empty slice yields all zeros.
///
/// # Examples
///
/// ```
/// use sumqc::quality::calculate_quality_stats;
///
/// let stats = calculate_quality_stats(&[]);
/// assert_eq!(stats.average_score, 0.0);
/// assert_eq!(stats.valid_count, 0);
/// ```
pub fn calculate_quality_stats(results: &[QualityCheckResult]) -> QualityStats {
    if results.is_empty() {
        return QualityStats::default();
    }

    let total = results.len();
    let score_sum: i64 = results.iter().map(|r| i64::from(r.score)).sum();
    let valid_count = results.iter().filter(|r| r.is_valid).count();
    let regenerations = results.iter().filter(|r| r.requires_regeneration).count();

    let mut stats = QualityStats {
        average_score: score_sum as f64 / total as f64,
        valid_count,
        invalid_count: total - valid_count,
        regeneration_rate: (regenerations as f64 * 100.0 / total as f64).round() as u32,
        ..QualityStats::default()
    };

    for issue in results.iter().flat_map(|r| &r.issues) {
        match issue.severity {
            Severity::Minor => stats.minor_issues_count += 1,
            Severity::Major => stats.major_issues_count += 1,
            Severity::Critical => stats.critical_issues_count += 1,
        }
    }

    stats
}
