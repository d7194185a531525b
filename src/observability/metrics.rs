//! Metrics collection and exposition.
//!
//! # Metrics
//! - `haproxy_sync_cycles_total` (counter): cycles by outcome
//! - `haproxy_sync_listeners` (gauge): listeners in the last rendered config
//! - `haproxy_sync_reload_duration_seconds` (histogram): reload command latency
//!
//! Recording is a no-op until an exporter is installed, so library users and
//! tests pay nothing.

use std::net::SocketAddr;
use std::time::Duration;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint. Must be called inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_cycle(outcome: &'static str) {
    ::metrics::counter!("haproxy_sync_cycles_total", "outcome" => outcome).increment(1);
}

pub fn record_listeners(count: usize) {
    ::metrics::gauge!("haproxy_sync_listeners").set(count as f64);
}

pub fn record_reload_duration(elapsed: Duration) {
    ::metrics::histogram!("haproxy_sync_reload_duration_seconds").record(elapsed.as_secs_f64());
}
