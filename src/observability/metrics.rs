//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by route and status
//! - `relay_request_duration_seconds` (histogram): time to response headers
//!
//! Recording goes through the `metrics` facade and is a no-op until an
//! exporter is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    metrics::describe_counter!("relay_requests_total", "Requests handled, by route and status");
    metrics::describe_histogram!(
        "relay_request_duration_seconds",
        metrics::Unit::Seconds,
        "Time until response headers were available"
    );

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one handled request.
pub fn record_request(route: &str, status: u16, start_time: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!("relay_request_duration_seconds", "route" => route.to_string())
        .record(start_time.elapsed().as_secs_f64());
}
