//! Duration-string parsing for the countdown thresholds.
//!
//! Accepted shapes:
//!
//! | Input | Seconds parser | Minutes parser |
//! |-------|----------------|----------------|
//! | `2:30:15` | 2 h 30 min 15 s | - |
//! | `0:30` | 0 min 30 s | 0 h 30 min |
//! | `1,5` / `1.5` | 1 min + 50 % of a minute | 1 h + 50 % of an hour |
//! | `120` | 120 s | 120 min (or hours, see below) |
//!
//! Every numeric fragment goes through [`crate::numeric::coerce_int`], so a
//! malformed piece counts as zero instead of failing the whole value.

use crate::numeric::coerce_int;

/// How a bare duration value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DurationUnit {
    /// Seconds parser: `MM:SS`, `H:MM:SS`, `MM,PP`, bare seconds.
    #[default]
    Seconds,
    /// Minutes parser: `H:MM`, `H,PP`, bare minutes.
    Minutes,
    /// Minutes parser where a single-digit bare number means whole hours.
    Hours,
}

impl DurationUnit {
    /// Parses `value` into a number of seconds using this unit's parser.
    #[must_use]
    pub fn to_seconds(self, value: &str) -> u64 {
        match self {
            Self::Seconds => parse_seconds(value),
            Self::Minutes => parse_minutes(value, false).saturating_mul(60),
            Self::Hours => parse_minutes(value, true).saturating_mul(60),
        }
    }
}

/// Parses a time string (`120`, `0:30`, `0,5`, `0.5`, `2:30:15`) to seconds.
///
/// Negative totals clamp to zero.
#[must_use]
pub fn parse_seconds(value: &str) -> u64 {
    let mut hours = 0;
    let mut minutes = 0;
    let seconds;

    if value.trim().is_empty() {
        return 0;
    }

    if value.contains(':') {
        let parts: Vec<&str> = value.split(':').collect();
        if parts.len() == 3 {
            hours = fragment(parts[0]);
            minutes = fragment(parts[1]);
            seconds = fragment(parts[2]);
        } else {
            minutes = fragment(parts[0]);
            seconds = fragment(parts[1]);
        }
    } else if let Some((whole, fraction)) = split_fraction(value) {
        minutes = fragment(whole);
        seconds = percent_to_sixtieths(percent_fragment(fraction));
    } else {
        seconds = fragment(value);
    }

    clamp_total(hours * 3600 + minutes * 60 + seconds)
}

/// Parses a time string (`120`, `0:30`, `0,5`, `0.5`) to minutes.
///
/// With `single_number_is_hour`, a bare one-character value such as `2` is
/// read as hours; longer bare values stay minutes.
#[must_use]
pub fn parse_minutes(value: &str, single_number_is_hour: bool) -> u64 {
    let mut hours = 0;
    let mut minutes = 0;

    if value.trim().is_empty() {
        return 0;
    }

    if value.contains(':') {
        let parts: Vec<&str> = value.split(':').collect();
        hours = fragment(parts[0]);
        minutes = fragment(parts[1]);
    } else if let Some((whole, fraction)) = split_fraction(value) {
        hours = fragment(whole);
        minutes = percent_to_sixtieths(percent_fragment(fraction));
    } else if single_number_is_hour && value.chars().count() == 1 {
        hours = fragment(value);
    } else {
        minutes = fragment(value);
    }

    clamp_total(hours * 60 + minutes)
}

/// Converts a percentage (0..=99) of a unit into sixtieths, rounded.
///
/// `50` → `30`, `25` → `15`, `5` → `3`.
#[must_use]
pub fn percent_to_sixtieths(percent: i64) -> i64 {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let rounded = (percent as f64 / 100.0 * 60.0).round() as i64;
    rounded
}

/// Splits on the first decimal separator, `,` taking precedence over `.`.
fn split_fraction(value: &str) -> Option<(&str, &str)> {
    if value.contains(',') {
        let mut parts = value.split(',');
        return Some((parts.next().unwrap_or_default(), parts.next().unwrap_or_default()));
    }
    if value.contains('.') {
        let mut parts = value.split('.');
        return Some((parts.next().unwrap_or_default(), parts.next().unwrap_or_default()));
    }
    None
}

/// Reads the fractional part as a two-digit percentage.
///
/// Longer fractions are cut to two characters, shorter ones are padded on
/// the right, so `5` means fifty percent and `05` means five.
fn percent_fragment(fraction: &str) -> i64 {
    let mut digits: String = fraction.chars().take(2).collect();
    while digits.chars().count() < 2 {
        digits.push('0');
    }
    fragment(&digits)
}

fn fragment(text: &str) -> i64 {
    let coerced = coerce_int(text);
    if coerced.is_fallback() && !text.trim().is_empty() {
        tracing::debug!(fragment = text, "unreadable duration fragment counted as 0");
    }
    i64::from(coerced.value())
}

fn clamp_total(total: i64) -> u64 {
    u64::try_from(total).unwrap_or(0)
}
