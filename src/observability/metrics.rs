//! Metrics collection and exposition.
//!
//! # Metrics
//! - `echo_requests_total` (counter): requests by method, status
//! - `echo_request_duration_seconds` (histogram): latency by method
//!
//! Without an installed recorder every update is a no-op, so the
//! middleware is always on and only the exporter is optional.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "echo_requests_total";
pub const REQUEST_DURATION: &str = "echo_request_duration_seconds";

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!(REQUESTS_TOTAL, "Requests answered, by method and status");
    describe_histogram!(REQUEST_DURATION, Unit::Seconds, "Time spent answering a request");

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one answered request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        REQUESTS_TOTAL,
        "method" => method.to_owned(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(REQUEST_DURATION, "method" => method.to_owned())
        .record(start.elapsed().as_secs_f64());
}

/// Middleware recording every response, including runtime rejections.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().as_str().to_owned();

    let response = next.run(request).await;
    record_request(&method, response.status().as_u16(), start);

    response
}
