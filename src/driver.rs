//! Console driver.
//!
//! Prompts for input, feeds every line through the [`DispatchGate`] and
//! restarts the [`CountdownEngine`] on acceptance. The countdown runs on its
//! own; the driver only waits for one of three things: a line, the
//! countdown reaching zero, or an interrupt. The last two end the run with
//! the matching farewell.

use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;

use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::countdown::CountdownEngine;
use crate::display::DisplayHandle;
use crate::farewell::{Pacing, Script};
use crate::gate::{DispatchGate, GateDecision, RejectReason};
use crate::observability::events::{Event, EventEmitter};
use crate::observability::metrics;

/// Console prompt.
pub const PROMPT: &str = ">: ";

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The countdown reached zero.
    Expired,
    /// An interrupt arrived first.
    Interrupted,
}

/// Owns the engine and the console for one run.
pub struct Driver {
    engine: CountdownEngine,
    gate: DispatchGate,
    console: Box<dyn Write + Send>,
    display: DisplayHandle,
    events: Arc<EventEmitter>,
    pacing: Pacing,
    silent: bool,
}

impl Driver {
    /// Creates a driver with the default gate and real pacing.
    #[must_use]
    pub fn new(
        engine: CountdownEngine,
        console: Box<dyn Write + Send>,
        display: DisplayHandle,
        events: Arc<EventEmitter>,
    ) -> Self {
        Self {
            engine,
            gate: DispatchGate::default(),
            console,
            display,
            events,
            pacing: Pacing::Real,
            silent: false,
        }
    }

    /// Replaces the gate.
    #[must_use]
    pub fn with_gate(mut self, gate: DispatchGate) -> Self {
        self.gate = gate;
        self
    }

    /// Sets farewell pacing.
    #[must_use]
    pub const fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Suppresses gate narration. The prompt and farewells still print.
    #[must_use]
    pub const fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Runs until the countdown ends or `interrupt` resolves, then plays
    /// the farewell.
    ///
    /// End of input does not end the run; the countdown keeps going.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the console cannot be written.
    pub async fn run<R, F>(mut self, input: R, interrupt: F) -> io::Result<Outcome>
    where
        R: AsyncBufRead + Unpin,
        F: Future<Output = ()>,
    {
        let mut lines = input.lines();
        let mut input_open = true;
        tokio::pin!(interrupt);

        self.engine.start();
        self.prompt()?;

        let outcome = loop {
            tokio::select! {
                biased;
                () = &mut interrupt => break Outcome::Interrupted,
                () = self.engine.wait_expired() => break Outcome::Expired,
                line = lines.next_line(), if input_open => match line {
                    Ok(Some(line)) => {
                        self.handle_line(&line).await?;
                        self.prompt()?;
                    }
                    Ok(None) => {
                        debug!("console input closed, waiting for the countdown");
                        input_open = false;
                    }
                    Err(e) => {
                        warn!(error = %e, "console read failed, ignoring further input");
                        input_open = false;
                    }
                },
            }
        };

        let phase = self.engine.phase();
        let remaining = self.engine.remaining();
        self.engine.shutdown().await;

        let script = match outcome {
            Outcome::Expired => {
                info!("countdown expired");
                Script::expiry()
            }
            Outcome::Interrupted => {
                info!(%phase, remaining, "interrupted");
                self.events.emit(Event::Interrupted {
                    timestamp: Utc::now(),
                    phase,
                    remaining_secs: remaining,
                });
                Script::interrupt()
            }
        };

        writeln!(self.console)?;
        let Self {
            mut console,
            display,
            pacing,
            ..
        } = self;
        tokio::task::spawn_blocking(move || script.play(&mut console, &display, pacing))
            .await
            .map_err(io::Error::other)??;

        Ok(outcome)
    }

    async fn handle_line(&mut self, line: &str) -> io::Result<()> {
        let phase = self.engine.phase();
        let decision = self.gate.evaluate(line, phase);
        debug!(%phase, outcome = decision.label(), "gate evaluated");

        metrics::record_gate_evaluation(decision.label());
        self.events.emit(Event::GateEvaluated {
            timestamp: Utc::now(),
            accepted: decision.is_accepted(),
            reason: match decision {
                GateDecision::Accepted => None,
                GateDecision::Rejected(reason) => Some(reason.label().to_owned()),
            },
            phase,
        });

        if !self.silent {
            self.narrate(line, decision)?;
        }

        if decision.is_accepted() {
            self.engine.restart().await;
            if !self.silent {
                writeln!(self.console, "{PROMPT}Countdown restarted!")?;
            }
        }
        Ok(())
    }

    fn narrate(&mut self, line: &str, decision: GateDecision) -> io::Result<()> {
        match decision {
            GateDecision::Rejected(reason) if reason.is_silent() => {}
            GateDecision::Rejected(RejectReason::WindowClosed { .. }) => {
                writeln!(self.console, "{PROMPT}{decision}")?;
            }
            _ => {
                writeln!(self.console, "{PROMPT}World parameters: {line}")?;
                writeln!(self.console, "{PROMPT}{decision}")?;
            }
        }
        Ok(())
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.console, "{PROMPT}")?;
        self.console.flush()
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("engine", &self.engine)
            .field("pacing", &self.pacing)
            .field("silent", &self.silent)
            .finish_non_exhaustive()
    }
}
