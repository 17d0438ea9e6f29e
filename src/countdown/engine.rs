//! The countdown engine.
//!
//! One tokio task per run ticks the remaining time down, one second per
//! tick period. The task only ever touches [`Shared`]; the engine owns the
//! task's cancellation token and join handle so that `stop`/`restart` can
//! cancel cooperatively and wait for the task to acknowledge before a new
//! one is spawned. At most one tick task exists at any time.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::TimerConfig;
use crate::display::{DisplayFrame, DisplayHandle};
use crate::observability::events::{Event, EventEmitter};
use crate::observability::metrics;

use super::format::{crossed_minute, format_clock};
use super::phase::{Phase, Thresholds};

// ============================================================================
// Shared state
// ============================================================================

/// State shared between the engine and its tick task.
struct Shared {
    thresholds: Thresholds,
    remaining: AtomicU64,
    phase_tx: watch::Sender<Phase>,
    display: DisplayHandle,
    events: Arc<EventEmitter>,
}

impl Shared {
    fn phase(&self) -> Phase {
        self.thresholds.classify(self.remaining.load(Ordering::Acquire))
    }

    /// Removes one second. Never blocks.
    fn tick(&self) -> Phase {
        let decremented =
            self.remaining
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |r| r.checked_sub(1));
        let Ok(before) = decremented else {
            // already at zero; Ended is terminal
            return Phase::Ended;
        };
        let after = before - 1;
        let phase = self.thresholds.classify(after);
        trace!(remaining = after, %phase, "tick");

        match phase {
            Phase::Normal => {
                if crossed_minute(before, after) {
                    self.display.push(DisplayFrame::minute_mark(after));
                }
            }
            Phase::Attention | Phase::Warning | Phase::Ended => {
                self.display.push(DisplayFrame::clock(after, phase));
            }
        }

        metrics::set_remaining(after);
        self.publish(phase, after);
        phase
    }

    /// Pushes the full `MMM:SS` value without waiting for a tick.
    ///
    /// The once-a-minute throttle only applies to ticks.
    fn show_current(&self, remaining: u64, phase: Phase) {
        self.display.push(DisplayFrame::clock(remaining, phase));
    }

    /// Publishes the phase, reporting a transition when it changed.
    fn publish(&self, phase: Phase, remaining: u64) {
        let from = self.phase_tx.send_replace(phase);
        if from == phase {
            return;
        }

        info!(%from, to = %phase, remaining = %format_clock(remaining), "phase entered");
        metrics::set_phase(phase);
        self.events.emit(Event::PhaseEntered {
            timestamp: Utc::now(),
            from,
            phase,
            remaining_secs: remaining,
        });
        if phase.is_terminal() {
            self.events.emit(Event::CountdownEnded {
                timestamp: Utc::now(),
            });
        }
    }
}

// ============================================================================
// Tick task
// ============================================================================

struct Ticker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

fn spawn_ticker(shared: Arc<Shared>, period: Duration) -> Ticker {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let handle = tokio::spawn(async move {
        // first decrement one full period after start
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        loop {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!("tick task cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if shared.tick().is_terminal() {
                        debug!("countdown ended, tick task exiting");
                        break;
                    }
                }
            }
        }
    });

    Ticker { cancel, handle }
}

// ============================================================================
// Engine
// ============================================================================

/// Countdown state machine with its own tick process.
///
/// Construction never starts ticking; call [`start`](Self::start). Dropping
/// the engine cancels a running tick task; [`shutdown`](Self::shutdown) does
/// the same and also waits for it.
pub struct CountdownEngine {
    shared: Arc<Shared>,
    tick_interval: Duration,
    ticker: Mutex<Option<Ticker>>,
    disposed: AtomicBool,
}

impl CountdownEngine {
    /// Creates an idle engine at the full start duration.
    #[must_use]
    pub fn new(config: &TimerConfig, display: DisplayHandle, events: Arc<EventEmitter>) -> Self {
        let thresholds = config.thresholds;
        let (phase_tx, _) = watch::channel(thresholds.classify(thresholds.start()));
        Self {
            shared: Arc::new(Shared {
                thresholds,
                remaining: AtomicU64::new(thresholds.start()),
                phase_tx,
                display,
                events,
            }),
            tick_interval: config.tick_interval,
            ticker: Mutex::new(None),
            disposed: AtomicBool::new(false),
        }
    }

    /// Starts the tick process and shows the current value immediately.
    ///
    /// A no-op when already running or after [`shutdown`](Self::shutdown).
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        if self.disposed.load(Ordering::Acquire) {
            warn!("start ignored: countdown engine already shut down");
            return;
        }

        let mut ticker = self.lock_ticker();
        if ticker.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            debug!("start ignored: tick task already running");
            return;
        }

        let remaining = self.remaining();
        let phase = self.shared.thresholds.classify(remaining);
        self.shared.show_current(remaining, phase);
        metrics::set_remaining(remaining);
        metrics::set_phase(phase);
        self.shared.publish(phase, remaining);

        let t = self.shared.thresholds;
        info!(
            remaining = %format_clock(remaining),
            attention = %format_clock(t.attention()),
            warning = %format_clock(t.warning()),
            "countdown started"
        );
        self.shared.events.emit(Event::CountdownStarted {
            timestamp: Utc::now(),
            start_secs: t.start(),
            attention_secs: t.attention(),
            warning_secs: t.warning(),
        });

        if phase.is_terminal() {
            debug!("nothing left to count down");
            *ticker = None;
            return;
        }
        *ticker = Some(spawn_ticker(Arc::clone(&self.shared), self.tick_interval));
    }

    /// Halts the tick process, keeping the remaining time and phase.
    ///
    /// Waits until the tick task has exited. Calling it on a stopped engine
    /// does nothing.
    pub async fn stop(&self) {
        let ticker = self.lock_ticker().take();
        let Some(Ticker { cancel, handle }) = ticker else {
            return;
        };
        cancel.cancel();
        if let Err(e) = handle.await {
            warn!(error = %e, "tick task did not exit cleanly");
        }
        debug!(remaining = self.remaining(), "countdown stopped");
    }

    /// Stops, resets to the start duration, and starts again.
    ///
    /// Works in any phase, including after the countdown has ended.
    pub async fn restart(&self) {
        self.stop().await;

        let from = self.phase();
        let start = self.shared.thresholds.start();
        let discarded = self.shared.remaining.swap(start, Ordering::AcqRel);

        info!(%from, discarded = %format_clock(discarded), "countdown restarted");
        metrics::record_restart();
        self.shared.events.emit(Event::CountdownRestarted {
            timestamp: Utc::now(),
            from,
            remaining_secs: discarded,
        });

        self.start();
    }

    /// Stops the tick process for good. Idempotent.
    pub async fn shutdown(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.stop().await;
        debug!("countdown engine shut down");
    }

    /// Advances the countdown by one second without waiting for the timer.
    ///
    /// The tick task calls the same logic; stepping by hand while the task
    /// is running would double-count.
    pub fn tick(&self) -> Phase {
        self.shared.tick()
    }

    /// Seconds left.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.shared.remaining.load(Ordering::Acquire)
    }

    /// Current phase, derived from the remaining time.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.shared.phase()
    }

    /// Configured thresholds.
    #[must_use]
    pub fn thresholds(&self) -> Thresholds {
        self.shared.thresholds
    }

    /// Returns `true` while a tick task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock_ticker()
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }

    /// Subscribes to phase changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.shared.phase_tx.subscribe()
    }

    /// Resolves once the countdown reaches [`Phase::Ended`].
    ///
    /// Resolves immediately if it already has.
    pub async fn wait_expired(&self) {
        let mut rx = self.subscribe();
        // the sender lives as long as `self`, so this cannot fail
        let _ = rx.wait_for(|phase| phase.is_terminal()).await;
    }

    fn lock_ticker(&self) -> MutexGuard<'_, Option<Ticker>> {
        self.ticker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        let slot = self
            .ticker
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(ticker) = slot.take() {
            ticker.cancel.cancel();
        }
    }
}

impl std::fmt::Debug for CountdownEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("thresholds", &self.shared.thresholds)
            .field("remaining", &self.remaining())
            .field("tick_interval", &self.tick_interval)
            .finish_non_exhaustive()
    }
}
