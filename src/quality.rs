//! Summary quality orchestration.
//!
//! [`check_summary_quality`] scores a summary together with its bulleted
//! detailed summary. The remaining functions aggregate and present those
//! verdicts, and pad summaries that came back far too short.

mod checker;
mod expand;
mod report;
mod stats;

pub use checker::{REQUIRED_BULLETS, check_summary_quality};
pub use expand::{EXPANSION_THRESHOLD, expand_summary_if_needed};
pub use report::generate_quality_report;
pub use stats::calculate_quality_stats;

pub use crate::config::{
    get_max_regeneration_attempts, get_min_quality_score, is_quality_check_enabled,
};
