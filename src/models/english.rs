use serde::{Deserialize, Serialize};
use std::fmt;

use super::Severity;

/// Severity of English/Japanese mixing, including the "nothing found" level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MixSeverity {
    #[default]
    None,
    Minor,
    Major,
    Critical,
}

impl MixSeverity {
    /// One tier less severe; `None` stays `None`.
    pub fn downgrade(self) -> Self {
        match self {
            Self::Critical => Self::Major,
            Self::Major => Self::Minor,
            Self::Minor | Self::None => Self::None,
        }
    }

    /// Maps to an issue severity, or `None` when nothing was found.
    pub fn as_issue_severity(self) -> Option<Severity> {
        match self {
            Self::None => None,
            Self::Minor => Some(Severity::Minor),
            Self::Major => Some(Severity::Major),
            Self::Critical => Some(Severity::Critical),
        }
    }
}

impl fmt::Display for MixSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// Output of the English-mixing detector.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnglishCheckResult {
    pub has_problematic_english: bool,
    pub problematic_phrases: Vec<String>,
    /// Allowlisted technical terms that were present in the text.
    pub allowed_terms: Vec<String>,
    pub severity: MixSeverity,
}
