//! Metrics collection and exposition.
//!
//! # Metrics
//! - `checker_probes_total` (counter): probes by outcome (`healthy` or error kind)
//! - `checker_probe_retries_total` (counter): retry delays taken
//! - `checker_probe_duration_seconds` (histogram): probe latency including retries
//! - `checker_workers` (gauge): size of the current worker pool
//!
//! Without an exporter the `metrics` macros are no-ops.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::probe::ProbeResult;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_probe(result: &ProbeResult, started: Instant) {
    let outcome = result.error.as_ref().map_or("healthy", |e| e.kind());
    counter!("checker_probes_total", "outcome" => outcome).increment(1);
    histogram!("checker_probe_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_retry() {
    counter!("checker_probe_retries_total").increment(1);
}

pub fn record_workers(count: usize) {
    gauge!("checker_workers").set(count as f64);
}
