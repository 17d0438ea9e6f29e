//! Permissive integer coercion.
//!
//! Duration strings and dispatch-gate tokens both come from a human at a
//! console. Neither parser ever fails on a malformed number: it falls back to
//! zero and keeps going. The fallback is spelled out as [`Coerced::Fallback`]
//! so callers can see (and log) which path a fragment took.

/// Outcome of coercing a text fragment to an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coerced {
    /// The trimmed fragment was a plain integer.
    Parsed(i32),
    /// The fragment only parsed after cutting it at the first `.` or `,`.
    Truncated(i32),
    /// Nothing usable; the zero default applies.
    Fallback,
}

impl Coerced {
    /// Returns the coerced value, `0` for [`Coerced::Fallback`].
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::Parsed(v) | Self::Truncated(v) => v,
            Self::Fallback => 0,
        }
    }

    /// Returns `true` when the zero default was used.
    #[must_use]
    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback)
    }
}

/// Coerces a fragment to an `i32`.
///
/// Order of attempts:
/// 1. blank (after trimming) → [`Coerced::Fallback`]
/// 2. the trimmed fragment as an integer (leading sign allowed)
/// 3. the fragment cut at the first `.`, then at the first `,`
/// 4. otherwise [`Coerced::Fallback`]
///
/// Values outside the `i32` range do not parse and therefore fall back.
#[must_use]
pub fn coerce_int(fragment: &str) -> Coerced {
    let trimmed = fragment.trim();
    if trimmed.is_empty() {
        return Coerced::Fallback;
    }

    if let Ok(v) = trimmed.parse::<i32>() {
        return Coerced::Parsed(v);
    }

    let mut cut = trimmed;
    if let Some(idx) = cut.find('.') {
        cut = &cut[..idx];
    }
    if let Some(idx) = cut.find(',') {
        cut = &cut[..idx];
    }

    match cut.trim().parse::<i32>() {
        Ok(v) => Coerced::Truncated(v),
        Err(_) => Coerced::Fallback,
    }
}

/// Coerces a fragment to an `i32`, using `0` when nothing parses.
#[must_use]
pub fn int_or_zero(fragment: &str) -> i32 {
    coerce_int(fragment).value()
}
