//! Prometheus counters.
//!
//! Counters are recorded through the `metrics` facade and are no-ops until
//! [`install_recorder`] runs, which keeps tests and library users free of a
//! global recorder.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Installs the process-wide Prometheus recorder.
///
/// # Errors
///
/// Returns an error if a recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    ::metrics::describe_counter!(
        "pulse_heartbeats_total",
        "Heartbeats received, by outcome"
    );
    ::metrics::describe_counter!("pulse_badges_total", "Badges rendered, by outcome");

    Ok(handle)
}

/// Record a heartbeat outcome (`ok`, `malformed`, `invalid_token`, `storage_error`).
pub fn record_heartbeat(outcome: &'static str) {
    ::metrics::counter!("pulse_heartbeats_total", "outcome" => outcome).increment(1);
}

/// Record a badge outcome (`live`, `offline`, `error`).
pub fn record_badge(outcome: &'static str) {
    ::metrics::counter!("pulse_badges_total", "outcome" => outcome).increment(1);
}
