//! `run`: the countdown itself.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::args::{ColorChoice, DisplayMode, RunArgs};
use crate::config::{RawDurations, TimerConfig};
use crate::countdown::CountdownEngine;
use crate::display::{DISPLAY_QUEUE_CAPACITY, DisplayHandle, TerminalDisplay, spawn_display};
use crate::driver::Driver;
use crate::error::SwanError;
use crate::farewell::Pacing;
use crate::observability::{EventEmitter, init_metrics};

/// Builds the countdown from `args` and runs it against stdin.
///
/// Returns once the farewell has been played, whether the countdown
/// expired or the process was interrupted.
///
/// # Errors
///
/// Returns a configuration error before anything starts if the thresholds
/// are out of order, or an I/O error if the events file, metrics listener,
/// or console fails.
pub async fn run(args: &RunArgs, color: ColorChoice) -> Result<(), SwanError> {
    let thresholds = RawDurations::from_timer_values(&args.timer, args.unit)?
        .overridden_by(
            args.start.clone(),
            args.attention.clone(),
            args.warning.clone(),
        )
        .resolve()?;
    let config = TimerConfig::new(thresholds).with_tick_interval(args.tick_interval)?;

    if let Some(port) = args.metrics_port {
        init_metrics(port)?;
    }

    let events = Arc::new(match &args.events_file {
        Some(path) => {
            info!(path = %path.display(), "writing events");
            EventEmitter::from_file(path)?
        }
        None => EventEmitter::noop(),
    });

    let cancel = CancellationToken::new();
    let (display, display_task) = match args.display {
        DisplayMode::Terminal => {
            let sink = Box::new(TerminalDisplay::stderr(color));
            let (handle, task) = spawn_display(sink, DISPLAY_QUEUE_CAPACITY, cancel.clone());
            (handle, Some(task))
        }
        DisplayMode::Off => (DisplayHandle::detached(), None),
    };

    let engine = CountdownEngine::new(&config, display.clone(), Arc::clone(&events));
    let pacing = if args.no_pacing {
        Pacing::Immediate
    } else {
        Pacing::Real
    };
    let driver = Driver::new(engine, Box::new(std::io::stdout()), display, events)
        .with_pacing(pacing)
        .silent(args.silent);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let result = driver.run(stdin, interrupted()).await;

    // the driver owned every display handle, so the render task drains and exits
    if result.is_err() {
        cancel.cancel();
    }
    if let Some(task) = display_task
        && let Err(e) = task.await
    {
        warn!(error = %e, "display task failed");
    }

    let outcome = result?;
    info!(?outcome, "run finished");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
///
/// Once resolved the handlers stay installed, so a second signal during the
/// farewell is swallowed instead of killing the process.
async fn interrupted() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
                return;
            }
            Err(e) => warn!(error = %e, "cannot listen for SIGTERM, Ctrl-C only"),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
