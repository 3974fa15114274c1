//! Tag canonicalization and classification.
//!
//! Raw tags from the article-ingestion path go through [`TagNormalizer`]
//! (alias mapping and case-insensitive dedup), are capped with
//! [`validate_and_normalize_tags`], and are then grouped into a fixed set of
//! domains by [`categorize_tag`] and friends.
//!
//! ```
//! use sumqc::tags::{TagNormalizer, categorize_multiple_tags, validate_and_normalize_tags};
//!
//! let tags = validate_and_normalize_tags(TagNormalizer::normalize_str("react, k8s, react, golang"));
//! assert_eq!(tags, vec!["React", "Kubernetes", "Go"]);
//!
//! let grouped = categorize_multiple_tags(&tags);
//! assert!(grouped.uncategorized.is_empty());
//! ```

mod categorizer;
mod normalizer;

pub use categorizer::{
    CategorizedTags, Category, ParseCategoryError, TagStatistics, categorize_multiple_tags,
    categorize_tag, tag_statistics,
};
pub use normalizer::{MAX_TAGS_PER_ARTICLE, TagNormalizer, validate_and_normalize_tags};
