//! Runtime configuration for callers of the quality engine.
//!
//! Values are read from environment variables at call time. Unset or
//! unparsable values fall back to the documented defaults.
use tracing::warn;

const ENABLED_VAR: &str = "QUALITY_CHECK_ENABLED";
const MIN_SCORE_VAR: &str = "QUALITY_MIN_SCORE";
const MAX_ATTEMPTS_VAR: &str = "MAX_REGENERATION_ATTEMPTS";

const DEFAULT_MIN_SCORE: i32 = 70;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Quality gate settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityConfig {
    /// Whether callers should run the checker at all (default true).
    pub enabled: bool,
    /// Score treated as acceptable by callers and batch stats (default 70).
    pub min_score: i32,
    /// Cap on the caller's regeneration loop (default 3).
    pub max_regeneration_attempts: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_score: DEFAULT_MIN_SCORE,
            max_regeneration_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl QualityConfig {
    /// Parses configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QUALITY_CHECK_ENABLED` (bool, default true)
    /// - `QUALITY_MIN_SCORE` (i32, default 70)
    /// - `MAX_REGENERATION_ATTEMPTS` (u32, default 3)
    ///
    /// # Examples
    ///
    /// ```
    /// use sumqc::config::QualityConfig;
    ///
    /// let config = QualityConfig::from_env();
    /// assert!(config.min_score >= 0);
    /// ```
    pub fn from_env() -> Self {
        Self {
            enabled: is_quality_check_enabled(),
            min_score: get_min_quality_score(),
            max_regeneration_attempts: get_max_regeneration_attempts(),
        }
    }

    /// Whether a score passes this configuration's threshold.
    pub fn accepts(&self, score: i32) -> bool {
        score >= self.min_score
    }
}

/// Reads `QUALITY_CHECK_ENABLED`.
pub fn is_quality_check_enabled() -> bool {
    read_var(ENABLED_VAR, parse_bool).unwrap_or(true)
}

/// Reads `QUALITY_MIN_SCORE`.
pub fn get_min_quality_score() -> i32 {
    read_var(MIN_SCORE_VAR, |s| s.parse().ok()).unwrap_or(DEFAULT_MIN_SCORE)
}

/// Reads `MAX_REGENERATION_ATTEMPTS`.
pub fn get_max_regeneration_attempts() -> u32 {
    read_var(MAX_ATTEMPTS_VAR, |s| s.parse().ok()).unwrap_or(DEFAULT_MAX_ATTEMPTS)
}

fn read_var<T>(name: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        warn!(var = name, value = %raw, "ignoring unparsable value, using default");
    }
    parsed
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        // SAFETY: tests touching the environment are serialized.
        unsafe {
            std::env::remove_var(ENABLED_VAR);
            std::env::remove_var(MIN_SCORE_VAR);
            std::env::remove_var(MAX_ATTEMPTS_VAR);
        }
    }

    #[test]
    #[serial]
    fn defaults_when_unset() {
        clear_env();
        assert_eq!(QualityConfig::from_env(), QualityConfig::default());
        assert!(is_quality_check_enabled());
        assert_eq!(get_min_quality_score(), 70);
        assert_eq!(get_max_regeneration_attempts(), 3);
    }

    #[test]
    #[serial]
    fn reads_valid_values() {
        clear_env();
        unsafe {
            std::env::set_var(ENABLED_VAR, "false");
            std::env::set_var(MIN_SCORE_VAR, "85");
            std::env::set_var(MAX_ATTEMPTS_VAR, "5");
        }

        let config = QualityConfig::from_env();
        assert!(!config.enabled);
        assert_eq!(config.min_score, 85);
        assert_eq!(config.max_regeneration_attempts, 5);

        clear_env();
    }

    #[test]
    #[serial]
    fn invalid_values_fall_back_to_defaults() {
        clear_env();
        unsafe {
            std::env::set_var(ENABLED_VAR, "maybe");
            std::env::set_var(MIN_SCORE_VAR, "high");
            std::env::set_var(MAX_ATTEMPTS_VAR, "-1");
        }

        assert_eq!(QualityConfig::from_env(), QualityConfig::default());

        clear_env();
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn accepts_uses_min_score() {
        let config = QualityConfig {
            min_score: 80,
            ..QualityConfig::default()
        };
        assert!(config.accepts(80));
        assert!(!config.accepts(79));
    }
}
