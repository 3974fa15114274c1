pub mod batch;
pub mod config;
pub mod content;
pub mod models;
pub mod quality;
pub mod tags;
pub mod utils;
pub mod validator;

pub use batch::{BatchError, ScoredRecord, SummaryRecord};
pub use config::QualityConfig;
pub use content::{check_content_quality, check_english_mixing};
pub use models::{
    ContentQualityCheckResult, EnglishCheckResult, IssueType, MixSeverity, QualityCheckResult,
    QualityIssue, QualityStats, Severity, ValidationResult,
};
pub use quality::check_summary_quality;
pub use tags::{Category, TagNormalizer, categorize_tag};
pub use validator::ArticleType;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkers_accessible_from_crate_root() {
        let result = check_summary_quality("", "");
        assert!(result.requires_regeneration);

        let content = check_content_quality("", None, None);
        assert!(!content.is_valid);

        let english = check_english_mixing("Rustで書く");
        assert_eq!(english.severity, MixSeverity::None);
    }

    #[test]
    fn types_accessible_from_crate_root() {
        assert_eq!(categorize_tag("rust"), Some(Category::Languages));
        assert_eq!(TagNormalizer::normalize_tag("k8s"), "Kubernetes");
        assert_eq!(Severity::Critical.to_string(), "critical");
        assert_eq!(IssueType::LanguageMix.to_string(), "language_mix");
        assert!(QualityConfig::default().enabled);
        assert_eq!("tutorial".parse::<ArticleType>(), Ok(ArticleType::Tutorial));
    }
}
