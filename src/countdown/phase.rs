//! Countdown phases and the thresholds that separate them.
//!
//! The phase is never stored on its own: it is always recomputed from the
//! remaining time with [`Thresholds::classify`]. Boundaries belong to the
//! lower phase, so `remaining == attention` is already
//! [`Phase::Attention`] and `remaining == warning` is already
//! [`Phase::Warning`].

use serde::Serialize;

use crate::error::ConfigError;

/// Default start duration: 108 minutes.
pub const DEFAULT_START_SECS: u64 = 6480;

/// Default attention threshold: 4 minutes.
pub const DEFAULT_ATTENTION_SECS: u64 = 240;

/// Default warning threshold: 10 seconds.
pub const DEFAULT_WARNING_SECS: u64 = 10;

/// End threshold. Fixed, not configurable.
pub const END_SECS: u64 = 0;

/// Coarse countdown state derived from the remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// `remaining > attention`
    Normal,
    /// `warning < remaining <= attention`
    Attention,
    /// `0 < remaining <= warning`
    Warning,
    /// `remaining == 0`; terminal
    Ended,
}

impl Phase {
    /// Stable lowercase name, used in logs, events, and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Attention => "attention",
            Self::Warning => "warning",
            Self::Ended => "ended",
        }
    }

    /// Ordinal used for the phase gauge.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Attention => 1,
            Self::Warning => 2,
            Self::Ended => 3,
        }
    }

    /// Returns `true` for [`Phase::Ended`].
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated countdown thresholds, in seconds.
///
/// Invariant: `start >= attention >= warning >= 0`. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    start: u64,
    attention: u64,
    warning: u64,
}

impl Thresholds {
    /// Builds thresholds, rejecting any ordering violation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ThresholdOrder`] unless
    /// `start >= attention >= warning`.
    pub fn new(start: u64, attention: u64, warning: u64) -> Result<Self, ConfigError> {
        if start < attention || attention < warning {
            return Err(ConfigError::ThresholdOrder {
                start,
                attention,
                warning,
            });
        }
        Ok(Self {
            start,
            attention,
            warning,
        })
    }

    /// Builds thresholds where any `None` takes its built-in default.
    ///
    /// The ordering check runs on the resolved values, so overriding only
    /// the start with something shorter than the default attention window
    /// is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ThresholdOrder`] if the resolved values are
    /// out of order.
    pub fn with_defaults(
        start: Option<u64>,
        attention: Option<u64>,
        warning: Option<u64>,
    ) -> Result<Self, ConfigError> {
        Self::new(
            start.unwrap_or(DEFAULT_START_SECS),
            attention.unwrap_or(DEFAULT_ATTENTION_SECS),
            warning.unwrap_or(DEFAULT_WARNING_SECS),
        )
    }

    /// Start duration in seconds.
    #[must_use]
    pub const fn start(&self) -> u64 {
        self.start
    }

    /// Attention threshold in seconds.
    #[must_use]
    pub const fn attention(&self) -> u64 {
        self.attention
    }

    /// Warning threshold in seconds.
    #[must_use]
    pub const fn warning(&self) -> u64 {
        self.warning
    }

    /// Classifies a remaining time into its phase.
    #[must_use]
    pub const fn classify(&self, remaining: u64) -> Phase {
        if remaining > self.attention {
            Phase::Normal
        } else if remaining > self.warning {
            Phase::Attention
        } else if remaining > END_SECS {
            Phase::Warning
        } else {
            Phase::Ended
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_SECS,
            attention: DEFAULT_ATTENTION_SECS,
            warning: DEFAULT_WARNING_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults() {
        let t = Thresholds::default();
        assert_eq!(t.start(), 6480);
        assert_eq!(t.attention(), 240);
        assert_eq!(t.warning(), 10);
        assert_eq!(Thresholds::with_defaults(None, None, None).unwrap(), t);
    }

    #[test]
    fn test_rejects_attention_above_start() {
        let err = Thresholds::new(10, 20, 1).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ThresholdOrder {
                start: 10,
                attention: 20,
                warning: 1
            }
        );
    }

    #[test]
    fn test_rejects_warning_above_attention() {
        assert!(Thresholds::new(100, 5, 6).is_err());
    }

    #[test]
    fn test_equal_thresholds_allowed() {
        assert!(Thresholds::new(5, 5, 5).is_ok());
        assert!(Thresholds::new(0, 0, 0).is_ok());
    }

    #[test]
    fn test_partial_override_checked_against_defaults() {
        // start below the default attention window of 240s
        assert!(Thresholds::with_defaults(Some(100), None, None).is_err());
        assert!(Thresholds::with_defaults(Some(100), Some(50), None).is_ok());
    }

    #[test]
    fn test_boundaries_belong_to_lower_phase() {
        let t = Thresholds::new(10, 5, 2).unwrap();
        assert_eq!(t.classify(10), Phase::Normal);
        assert_eq!(t.classify(6), Phase::Normal);
        assert_eq!(t.classify(5), Phase::Attention);
        assert_eq!(t.classify(3), Phase::Attention);
        assert_eq!(t.classify(2), Phase::Warning);
        assert_eq!(t.classify(1), Phase::Warning);
        assert_eq!(t.classify(0), Phase::Ended);
    }

    #[test]
    fn test_collapsed_windows() {
        let t = Thresholds::new(5, 5, 5).unwrap();
        assert_eq!(t.classify(5), Phase::Warning);
        assert_eq!(t.classify(6), Phase::Normal);

        let t = Thresholds::new(5, 3, 0).unwrap();
        assert_eq!(t.classify(1), Phase::Attention);
        assert_eq!(t.classify(0), Phase::Ended);
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::Normal.to_string(), "normal");
        assert_eq!(Phase::Ended.as_str(), "ended");
        assert!(Phase::Ended.is_terminal());
        assert!(!Phase::Warning.is_terminal());
        assert_eq!(
            serde_json::to_string(&Phase::Attention).unwrap(),
            "\"attention\""
        );
    }

    fn ordered_thresholds() -> impl Strategy<Value = Thresholds> {
        (0u64..500, 0u64..500, 0u64..500).prop_map(|(a, b, c)| {
            let mut v = [a, b, c];
            v.sort_unstable();
            Thresholds::new(v[2], v[1], v[0]).unwrap()
        })
    }

    proptest! {
        #[test]
        fn classify_matches_threshold_rule(t in ordered_thresholds(), remaining in 0u64..600) {
            let expected = if remaining > t.attention() {
                Phase::Normal
            } else if remaining > t.warning() {
                Phase::Attention
            } else if remaining > 0 {
                Phase::Warning
            } else {
                Phase::Ended
            };
            prop_assert_eq!(t.classify(remaining), expected);
        }

        #[test]
        fn classify_is_monotone(t in ordered_thresholds(), remaining in 1u64..600) {
            prop_assert!(t.classify(remaining - 1).ordinal() >= t.classify(remaining).ordinal());
        }
    }
}
