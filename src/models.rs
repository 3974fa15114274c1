mod check_result;
mod english;
mod issue;
mod validation;

pub use check_result::{
    ContentQualityCheckResult, QUALITY_THRESHOLD, QualityCheckResult, QualityStats,
};
pub use english::{EnglishCheckResult, MixSeverity};
pub use issue::{IssueType, QualityIssue, Severity};
pub use validation::ValidationResult;
