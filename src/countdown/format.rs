//! Time text shown on the display.
//!
//! Minutes are zero-padded to three digits so the full 108-minute default
//! fits (`108:00`). Longer durations simply widen the field.

/// Formats remaining seconds as `MMM:SS` (floor of total minutes).
#[must_use]
pub fn format_clock(seconds: u64) -> String {
    format!("{:03}:{:02}", seconds / 60, seconds % 60)
}

/// Formats remaining seconds as `MMM:00`, rounding the minutes up.
///
/// Used while the countdown is in its normal phase, where the display only
/// changes when a whole minute has gone by.
#[must_use]
pub fn format_minute_mark(seconds: u64) -> String {
    format!("{:03}:00", ceil_minutes(seconds))
}

/// Whole minutes, rounded up.
#[must_use]
pub const fn ceil_minutes(seconds: u64) -> u64 {
    seconds.div_ceil(60)
}

/// Returns `true` when a tick from `before` to `after` seconds crossed a
/// whole-minute boundary (by rounded-up minute count).
#[must_use]
pub const fn crossed_minute(before: u64, after: u64) -> bool {
    ceil_minutes(before) != ceil_minutes(after)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(6480), "108:00");
        assert_eq!(format_clock(240), "004:00");
        assert_eq!(format_clock(239), "003:59");
        assert_eq!(format_clock(10), "000:10");
        assert_eq!(format_clock(0), "000:00");
        assert_eq!(format_clock(60_000), "1000:00");
    }

    #[test]
    fn minute_mark_rounds_up() {
        assert_eq!(format_minute_mark(6480), "108:00");
        assert_eq!(format_minute_mark(6479), "108:00");
        assert_eq!(format_minute_mark(6420), "107:00");
        assert_eq!(format_minute_mark(241), "005:00");
    }

    #[test]
    fn minute_crossings() {
        assert!(!crossed_minute(6480, 6479));
        assert!(!crossed_minute(6422, 6421));
        assert!(crossed_minute(6421, 6420));
        assert!(crossed_minute(1, 0));
    }
}
