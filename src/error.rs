//! Error types for `swanclock`
//!
//! Configuration problems are the only fatal failures in the countdown core.
//! Gate rejections are ordinary values (see [`crate::gate::GateDecision`]) and
//! display faults are absorbed by the display layer, so neither appears here
//! as a variant the driver has to propagate.

use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `swanclock` CLI operations.
///
/// Both natural expiry and an interrupt end with [`ExitCode::SUCCESS`]; the
/// non-zero codes are reserved for failures before the countdown starts.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution (expiry, interrupt, or a completed subcommand)
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (threshold ordering, inconsistent options)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (events file, metrics listener, console)
    pub const IO_ERROR: i32 = 3;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `swanclock` operations.
#[derive(Debug, Error)]
pub enum SwanError {
    /// Timer configuration was rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SwanError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Timer configuration errors.
///
/// Raised while resolving the three thresholds, before any engine exists.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The thresholds are not ordered `start >= attention >= warning >= 0`
    #[error(
        "thresholds must satisfy start >= attention >= warning \
         (got start={start}s, attention={attention}s, warning={warning}s)"
    )]
    ThresholdOrder {
        /// Resolved start duration in seconds
        start: u64,
        /// Resolved attention threshold in seconds
        attention: u64,
        /// Resolved warning threshold in seconds
        warning: u64,
    },

    /// An option has a value the countdown cannot use
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the option
        field: String,
        /// The value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

// ============================================================================
// Display Errors
// ============================================================================

/// Display sink errors.
///
/// Only surfaced from [`crate::display::DisplaySink::render`]; the render task
/// logs the first one and tears the sink down.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// Writing to the display target failed
    #[error("display write failed: {0}")]
    Write(#[from] std::io::Error),

    /// The display was already torn down
    #[error("display closed")]
    Closed,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::ERROR, 1);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::USAGE_ERROR, 64);
    }

    #[test]
    fn test_config_error_exit_code() {
        let err: SwanError = ConfigError::ThresholdOrder {
            start: 10,
            attention: 20,
            warning: 1,
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: SwanError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_json_error_exit_code() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SwanError = json_err.into();
        assert_eq!(err.exit_code(), ExitCode::ERROR);
    }

    #[test]
    fn test_display_error_wraps_io() {
        let err: DisplayError = std::io::Error::other("gone").into();
        assert_eq!(err.to_string(), "display write failed: gone");
    }

    #[test]
    fn test_threshold_order_display() {
        let err = ConfigError::ThresholdOrder {
            start: 10,
            attention: 20,
            warning: 1,
        };
        let text = err.to_string();
        assert!(text.contains("start=10s"));
        assert!(text.contains("attention=20s"));
        assert!(text.contains("warning=1s"));
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::InvalidValue {
            field: "timer".to_string(),
            value: "a b c d".to_string(),
            expected: "at most three durations".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for 'timer': got 'a b c d', expected at most three durations"
        );
    }
}
