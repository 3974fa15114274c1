//! Content heuristics for short summaries.
//!
//! [`check_content_quality`] scores a summary on length, truncation, thin
//! content, English mixing and termination. [`fix_summary`] applies
//! rule-based repairs for the issues it found, and
//! [`create_enhanced_prompt`] turns them into instructions for a
//! regeneration request.

mod checker;
mod english;
mod fixer;
mod prompt;

pub use checker::{CONTENT_MAX_LENGTH, CONTENT_MIN_LENGTH, check_content_quality};
pub use english::check_english_mixing;
pub use fixer::fix_summary;
pub use prompt::{PROMPT_CONTENT_LIMIT, create_enhanced_prompt};
