//! Dispatch gate: decides whether a console line authorizes a restart.
//!
//! The gate is a pure function of the input line and the current phase. It
//! never touches the countdown; the driver restarts the engine when the
//! decision is [`GateDecision::Accepted`].

use std::fmt;

use crate::countdown::phase::Phase;
use crate::numeric::int_or_zero;

/// The code that restarts the countdown.
pub const DEFAULT_REFERENCE: [i32; 6] = [4, 8, 15, 16, 23, 42];

/// Returns `true` while input is considered at all: the attention and
/// warning phases.
#[must_use]
pub const fn is_input_window_open(phase: Phase) -> bool {
    matches!(phase, Phase::Attention | Phase::Warning)
}

// ============================================================================
// Reference vector
// ============================================================================

/// Ordered values a line must match position by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceVector {
    values: Box<[i32]>,
}

impl ReferenceVector {
    /// Wraps the given values.
    #[must_use]
    pub fn new(values: impl Into<Box<[i32]>>) -> Self {
        Self {
            values: values.into(),
        }
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Expected values in order.
    #[must_use]
    pub fn values(&self) -> &[i32] {
        &self.values
    }
}

impl Default for ReferenceVector {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE)
    }
}

// ============================================================================
// Decisions
// ============================================================================

/// Why a line did not authorize a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The line was empty or whitespace only.
    EmptyInput,
    /// The countdown was outside the attention and warning phases.
    WindowClosed {
        /// Phase at evaluation time
        phase: Phase,
    },
    /// The line had the wrong number of tokens.
    WrongParameterCount {
        /// Reference length
        expected: usize,
        /// Tokens found
        actual: usize,
    },
    /// A token did not match its reference value.
    ParameterMismatch {
        /// First mismatching position (zero-based)
        position: usize,
    },
}

impl RejectReason {
    /// Empty lines are dropped without any console feedback.
    #[must_use]
    pub const fn is_silent(self) -> bool {
        matches!(self, Self::EmptyInput)
    }

    /// Stable label for events and metrics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::WindowClosed { .. } => "window_closed",
            Self::WrongParameterCount { .. } => "wrong_parameter_count",
            Self::ParameterMismatch { .. } => "parameter_mismatch",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => f.write_str("No world parameters entered."),
            Self::WindowClosed { .. } => f.write_str("Input is actually not open!"),
            Self::WrongParameterCount { .. } => {
                f.write_str("Incorrect world parameter amount entered!")
            }
            Self::ParameterMismatch { .. } => f.write_str("Incorrect world parameter entered!"),
        }
    }
}

/// Outcome of [`DispatchGate::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The code matched inside the input window.
    Accepted,
    /// Anything else.
    Rejected(RejectReason),
}

impl GateDecision {
    /// Returns `true` for [`GateDecision::Accepted`].
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Stable label for events and metrics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected(reason) => reason.label(),
        }
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("Correct world parameter entered!"),
            Self::Rejected(reason) => reason.fmt(f),
        }
    }
}

// ============================================================================
// Gate
// ============================================================================

/// Validates console lines against a [`ReferenceVector`].
#[derive(Debug, Clone, Default)]
pub struct DispatchGate {
    reference: ReferenceVector,
}

impl DispatchGate {
    /// Creates a gate for the given reference.
    #[must_use]
    pub const fn new(reference: ReferenceVector) -> Self {
        Self { reference }
    }

    /// The reference this gate compares against.
    #[must_use]
    pub const fn reference(&self) -> &ReferenceVector {
        &self.reference
    }

    /// Evaluates one input line in the given phase.
    ///
    /// Tokens are separated by single spaces, so two spaces in a row yield
    /// an empty token. Each token goes through the zero-fallback integer
    /// coercion before comparison.
    #[must_use]
    pub fn evaluate(&self, line: &str, phase: Phase) -> GateDecision {
        if line.trim().is_empty() {
            return GateDecision::Rejected(RejectReason::EmptyInput);
        }
        if !is_input_window_open(phase) {
            return GateDecision::Rejected(RejectReason::WindowClosed { phase });
        }

        let tokens: Vec<&str> = line.split(' ').collect();
        if tokens.len() != self.reference.len() {
            return GateDecision::Rejected(RejectReason::WrongParameterCount {
                expected: self.reference.len(),
                actual: tokens.len(),
            });
        }

        let mismatch = tokens
            .iter()
            .zip(self.reference.values())
            .position(|(token, &expected)| int_or_zero(token) != expected);

        match mismatch {
            Some(position) => GateDecision::Rejected(RejectReason::ParameterMismatch { position }),
            None => GateDecision::Accepted,
        }
    }
}
