//! Countdown configuration.
//!
//! Turns the duration strings given on the command line (or through
//! `SWANCLOCK_*` environment variables) into validated [`Thresholds`] plus
//! the tick period. Everything here runs once, before the engine exists.

pub mod duration;

use std::time::Duration;

use tracing::info;

use crate::countdown::format::format_clock;
use crate::countdown::phase::Thresholds;
use crate::error::ConfigError;

pub use duration::DurationUnit;

/// Default tick period.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Maximum number of values accepted by the positional `--timer` form.
pub const MAX_TIMER_VALUES: usize = 3;

/// Unparsed duration strings, as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDurations {
    /// Start duration
    pub start: Option<String>,
    /// Attention threshold
    pub attention: Option<String>,
    /// Warning threshold
    pub warning: Option<String>,
    /// Parser used for every value
    pub unit: DurationUnit,
}

impl RawDurations {
    /// Maps the positional `--timer START [ATTENTION] [WARNING]` form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for more than three values.
    pub fn from_timer_values(values: &[String], unit: DurationUnit) -> Result<Self, ConfigError> {
        if values.len() > MAX_TIMER_VALUES {
            return Err(ConfigError::InvalidValue {
                field: "timer".to_string(),
                value: values.join(" "),
                expected: "at most three durations (start, attention, warning)".to_string(),
            });
        }

        let mut iter = values.iter().cloned();
        Ok(Self {
            start: iter.next(),
            attention: iter.next(),
            warning: iter.next(),
            unit,
        })
    }

    /// Lets explicitly named values replace positional ones.
    #[must_use]
    pub fn overridden_by(
        mut self,
        start: Option<String>,
        attention: Option<String>,
        warning: Option<String>,
    ) -> Self {
        if start.is_some() {
            self.start = start;
        }
        if attention.is_some() {
            self.attention = attention;
        }
        if warning.is_some() {
            self.warning = warning;
        }
        self
    }

    /// Parses every present value and validates the resulting thresholds.
    ///
    /// Omitted values fall back to the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ThresholdOrder`] if the resolved thresholds
    /// are out of order.
    pub fn resolve(&self) -> Result<Thresholds, ConfigError> {
        let start = self.parse_one("start", self.start.as_deref());
        let attention = self.parse_one("attention", self.attention.as_deref());
        let warning = self.parse_one("warning", self.warning.as_deref());
        Thresholds::with_defaults(start, attention, warning)
    }

    fn parse_one(&self, name: &'static str, value: Option<&str>) -> Option<u64> {
        let raw = value?;
        let seconds = self.unit.to_seconds(raw);
        info!(
            threshold = name,
            input = raw,
            seconds,
            clock = %format_clock(seconds),
            "threshold initialized"
        );
        Some(seconds)
    }
}

/// Validated countdown configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// Phase thresholds
    pub thresholds: Thresholds,
    /// Period between ticks; each tick removes one second
    pub tick_interval: Duration,
}

impl TimerConfig {
    /// Builds a configuration with the default one-second tick.
    #[must_use]
    pub const fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Replaces the tick period.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero period.
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Result<Self, ConfigError> {
        if tick_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "tick-interval".to_string(),
                value: humantime::format_duration(tick_interval).to_string(),
                expected: "a period greater than zero".to_string(),
            });
        }
        self.tick_interval = tick_interval;
        Ok(self)
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}
