//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status
//! - `gateway_request_duration_seconds` (histogram): end-to-end latency
//! - `gateway_upstream_requests_total` (counter): backend responses by service, status
//! - `gateway_auth_failures_total` (counter): rejected authentications by kind

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::config::ServiceName;

/// Install the Prometheus recorder with its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one backend answer; `None` is a transport failure.
pub fn record_upstream(service: ServiceName, status: Option<u16>) {
    let status = status.map(|s| s.to_string()).unwrap_or_else(|| "error".to_string());
    counter!(
        "gateway_upstream_requests_total",
        "service" => service.as_str(),
        "status" => status
    )
    .increment(1);
}

pub fn record_auth_failure(kind: &'static str) {
    counter!("gateway_auth_failures_total", "kind" => kind).increment(1);
}
