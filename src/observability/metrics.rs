//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, path, status
//! - `http_request_duration_seconds` (histogram): latency distribution
//! - `yakoa_requests_total` (counter): Yakoa calls by operation, outcome
//! - `chain_transactions_total` (counter): contract writes by operation, outcome
//! - `dependency_health` (gauge): 1=healthy, 0=unhealthy

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one served request.
pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a Yakoa call outcome ("ok", "conflict", "error", "mock", ...).
pub fn record_yakoa_call(operation: &'static str, outcome: &'static str) {
    metrics::counter!("yakoa_requests_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
}

/// Record a contract write outcome.
pub fn record_chain_tx(operation: &str, success: bool) {
    let outcome = if success { "confirmed" } else { "failed" };
    metrics::counter!(
        "chain_transactions_total",
        "operation" => operation.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record reachability of an external dependency.
pub fn record_dependency_health(dependency: &'static str, healthy: bool) {
    metrics::gauge!("dependency_health", "dependency" => dependency)
        .set(if healthy { 1.0 } else { 0.0 });
}

/// Middleware recording per-route request metrics.
///
/// Labels by matched route template, or `unmatched` for the fallback.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &path, response.status().as_u16(), start);
    response
}
