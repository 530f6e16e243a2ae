//! Metrics collection and exposition.
//!
//! # Metrics
//! - `payload_requests_total` (counter): requests by method, status
//! - `payload_request_duration_seconds` (histogram): latency distribution
//! - `payload_compile_total` (counter): compilations by extension, cache hit/miss
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Labels kept to bounded sets (no URIs)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start_time: Instant) {
    metrics::counter!(
        "payload_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("payload_request_duration_seconds")
        .record(start_time.elapsed().as_secs_f64());
}

pub fn record_compile(extension: &str, cache: &'static str) {
    metrics::counter!(
        "payload_compile_total",
        "extension" => extension.to_string(),
        "cache" => cache
    )
    .increment(1);
}
