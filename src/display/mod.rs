//! Display surface for the countdown.
//!
//! The engine never touches a sink directly. It pushes [`DisplayFrame`]s into
//! a bounded queue through a [`DisplayHandle`]; a render task owns the
//! receiving end and the [`DisplaySink`]. Pushing never blocks and never
//! fails: a full queue or a torn-down sink drops the frame.
//!
//! # Architecture
//!
//! - [`DisplayHandle`]: cloneable, non-blocking producer side
//! - [`spawn_display`]: render task, coalesces to the most recent frame
//! - [`DisplaySink`]: what actually draws ([`TerminalDisplay`], [`NullDisplay`])

pub mod terminal;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::countdown::format::{format_clock, format_minute_mark};
use crate::countdown::phase::Phase;
use crate::error::DisplayError;

pub use terminal::TerminalDisplay;

/// Queue depth between the engine and the render task.
pub const DISPLAY_QUEUE_CAPACITY: usize = 32;

// ============================================================================
// Frames
// ============================================================================

/// Colour/state signal shown alongside the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    /// Plain (white) text.
    #[default]
    Normal,
    /// Attention (orange) text.
    Attention,
    /// Warning (red) text. Also used once the countdown has ended.
    Warning,
}

impl From<Phase> for Tone {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Normal => Self::Normal,
            Phase::Attention => Self::Attention,
            Phase::Warning | Phase::Ended => Self::Warning,
        }
    }
}

/// One display update: text plus tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    /// Text to show, usually `MMM:SS`
    pub text: String,
    /// Colour/state signal
    pub tone: Tone,
}

impl DisplayFrame {
    /// Creates a frame from arbitrary text.
    #[must_use]
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    /// Full `MMM:SS` frame for the given remaining time and phase.
    #[must_use]
    pub fn clock(remaining: u64, phase: Phase) -> Self {
        Self::new(format_clock(remaining), phase.into())
    }

    /// `MMM:00` frame used on whole-minute boundaries in the normal phase.
    #[must_use]
    pub fn minute_mark(remaining: u64) -> Self {
        Self::new(format_minute_mark(remaining), Tone::Normal)
    }
}

// ============================================================================
// Handle
// ============================================================================

/// Producer side of the display queue.
///
/// A detached handle (no queue) accepts and discards everything, which is
/// what tests and headless runs use.
#[derive(Debug, Clone, Default)]
pub struct DisplayHandle {
    tx: Option<mpsc::Sender<DisplayFrame>>,
}

impl DisplayHandle {
    /// Creates a bounded queue and returns both ends.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<DisplayFrame>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx: Some(tx) }, rx)
    }

    /// Creates a handle that discards every frame.
    #[must_use]
    pub const fn detached() -> Self {
        Self { tx: None }
    }

    /// Queues a frame without waiting.
    ///
    /// Returns `true` if the frame was queued. A full queue or a closed
    /// render task drops the frame.
    pub fn push(&self, frame: DisplayFrame) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };
        match tx.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(frame)) => {
                trace!(text = %frame.text, "display queue full; frame dropped");
                false
            }
            Err(TrySendError::Closed(frame)) => {
                trace!(text = %frame.text, "display closed; frame dropped");
                false
            }
        }
    }
}

// ============================================================================
// Sinks
// ============================================================================

/// Something that can show a frame.
pub trait DisplaySink: Send {
    /// Draws the frame, replacing whatever was shown before.
    ///
    /// # Errors
    ///
    /// Returns a [`DisplayError`] when the target can no longer be drawn to.
    fn render(&mut self, frame: &DisplayFrame) -> Result<(), DisplayError>;
}

/// Sink that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn render(&mut self, _frame: &DisplayFrame) -> Result<(), DisplayError> {
        Ok(())
    }
}

// ============================================================================
// Render task
// ============================================================================

/// Spawns the render task and returns the handle that feeds it.
///
/// The task renders the most recent queued frame, skipping any that piled
/// up in between. It ends when `cancel` fires, when every handle has been
/// dropped, or after the first sink error; from then on pushes are dropped.
pub fn spawn_display(
    mut sink: Box<dyn DisplaySink>,
    capacity: usize,
    cancel: CancellationToken,
) -> (DisplayHandle, JoinHandle<()>) {
    let (handle, mut rx) = DisplayHandle::channel(capacity);

    let task = tokio::spawn(async move {
        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("display task cancelled");
                    break;
                }
                frame = rx.recv() => frame,
            };

            let Some(mut frame) = next else {
                debug!("all display handles dropped");
                break;
            };
            while let Ok(newer) = rx.try_recv() {
                frame = newer;
            }

            if let Err(e) = sink.render(&frame) {
                warn!(error = %e, "display sink failed; further updates are dropped");
                break;
            }
        }
        rx.close();
    });

    (handle, task)
}
