//! Structured countdown event stream.
//!
//! Lifecycle events are serialized as newline-delimited JSON, each line
//! carrying a monotonically increasing `sequence` number and a UTC
//! timestamp. The stream is a side channel: write failures are dropped and
//! never reach the countdown.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::countdown::phase::Phase;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete countdown event, tagged with `"type"` in JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The tick process started from the full start duration.
    CountdownStarted {
        /// When the countdown started.
        timestamp: DateTime<Utc>,
        /// Start duration in seconds.
        start_secs: u64,
        /// Attention threshold in seconds.
        attention_secs: u64,
        /// Warning threshold in seconds.
        warning_secs: u64,
    },

    /// The countdown moved into a new phase.
    PhaseEntered {
        /// When the transition occurred.
        timestamp: DateTime<Utc>,
        /// Phase left behind.
        from: Phase,
        /// Phase entered.
        phase: Phase,
        /// Remaining seconds at the transition.
        remaining_secs: u64,
    },

    /// The countdown was reset to its start duration.
    CountdownRestarted {
        /// When the restart happened.
        timestamp: DateTime<Utc>,
        /// Phase the countdown was in before the reset.
        from: Phase,
        /// Remaining seconds discarded by the reset.
        remaining_secs: u64,
    },

    /// A console line went through the dispatch gate.
    GateEvaluated {
        /// When the line was evaluated.
        timestamp: DateTime<Utc>,
        /// Whether the code was accepted.
        accepted: bool,
        /// Rejection label, absent on acceptance.
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        /// Phase at evaluation time.
        phase: Phase,
    },

    /// The countdown reached zero.
    CountdownEnded {
        /// When the countdown ended.
        timestamp: DateTime<Utc>,
    },

    /// The process received an interrupt before the countdown ended.
    Interrupted {
        /// When the interrupt arrived.
        timestamp: DateTime<Utc>,
        /// Phase at interrupt time.
        phase: Phase,
        /// Remaining seconds at interrupt time.
        remaining_secs: u64,
    },
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct EventEnvelope {
    sequence: u64,
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Every [`emit`](Self::emit) takes the next sequence number, writes one
/// line and flushes.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter over the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that discards everything.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter writing to a freshly created file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as one JSONL line. Failures are dropped.
    pub fn emit(&self, event: Event) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope { sequence, event };

        if let Ok(mut w) = self.writer.lock()
            && let Ok(line) = serde_json::to_string(&envelope)
        {
            let _ = writeln!(w, "{line}");
            let _ = w.flush();
        }
    }

    /// Number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}
