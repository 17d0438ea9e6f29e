//! Prometheus metrics for the countdown.
//!
//! The recorder is only installed when a metrics port is configured; until
//! then every `record_*`/`set_*` call is a silent no-op.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::countdown::phase::Phase;
use crate::error::SwanError;

/// Guard against installing the recorder twice.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Installs the global Prometheus recorder with an HTTP listener on
/// `127.0.0.1:<port>`.
///
/// # Errors
///
/// Returns `SwanError::Io` if the listener cannot be bound.
pub fn init_metrics(port: u16) -> Result<(), SwanError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    PrometheusBuilder::new()
        .with_http_listener(([127, 0, 0, 1], port))
        .install()
        .map_err(|e| SwanError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    tracing::info!(port, "metrics endpoint listening");
    Ok(())
}

fn describe_metrics() {
    describe_gauge!(
        "swanclock_remaining_seconds",
        "Seconds left on the countdown"
    );
    describe_gauge!(
        "swanclock_phase",
        "Current phase (0 normal, 1 attention, 2 warning, 3 ended)"
    );
    describe_counter!(
        "swanclock_gate_evaluations_total",
        "Console lines evaluated by the dispatch gate, by outcome"
    );
    describe_counter!(
        "swanclock_restarts_total",
        "Countdown restarts"
    );
}

/// Sets the remaining-time gauge.
#[allow(clippy::cast_precision_loss)]
pub fn set_remaining(seconds: u64) {
    gauge!("swanclock_remaining_seconds").set(seconds as f64);
}

/// Sets the phase gauge.
pub fn set_phase(phase: Phase) {
    gauge!("swanclock_phase").set(f64::from(phase.ordinal()));
}

/// Counts one gate evaluation. `outcome` is `"accepted"` or a rejection label.
pub fn record_gate_evaluation(outcome: &'static str) {
    counter!("swanclock_gate_evaluations_total", "outcome" => outcome).increment(1);
}

/// Counts one restart.
pub fn record_restart() {
    counter!("swanclock_restarts_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_functions_do_not_panic_without_recorder() {
        set_remaining(6480);
        set_phase(Phase::Warning);
        record_gate_evaluation("accepted");
        record_gate_evaluation("window_closed");
        record_restart();
    }
}
