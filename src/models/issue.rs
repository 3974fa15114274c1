use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a quality problem found in a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// Character count outside the accepted band.
    Length,
    /// Structural problem (bullet layout, missing terminator).
    Format,
    /// Wrong or missing sentence punctuation.
    Punctuation,
    /// Text appears to be cut off mid-sentence.
    Truncation,
    /// Boilerplate or unspecific content.
    ThinContent,
    /// English grammar mixed into Japanese text.
    LanguageMix,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Format => "format",
            Self::Punctuation => "punctuation",
            Self::Truncation => "truncation",
            Self::ThinContent => "thin_content",
            Self::LanguageMix => "language_mix",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How serious an issue is. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }

    /// Report glyph used in markdown output.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Critical => "🔴",
            Self::Major => "🟡",
            Self::Minor => "🔵",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single problem found by one of the checkers.
///
/// Issues are produced once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl QualityIssue {
    pub fn new(issue_type: IssueType, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            issue_type,
            severity,
            message: message.into(),
            details: None,
        }
    }

    /// Attaches structured details to the issue.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}
