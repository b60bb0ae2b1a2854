//! # Prometheus Metrics
//!
//! Request metrics recorded through the `metrics` facade. With no recorder
//! installed (tests, embedding) the counters are no-ops; the binary installs
//! a Prometheus recorder and serves it at `GET /metrics`.

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Total requests, labelled by method, route, and status.
pub const REQUESTS_TOTAL: &str = "zkyc_http_requests_total";

/// Requests answered with a 4xx or 5xx status.
pub const ERRORS_TOTAL: &str = "zkyc_http_errors_total";

/// Install the global Prometheus recorder.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!(REQUESTS_TOTAL, "HTTP requests handled");
    metrics::describe_counter!(ERRORS_TOTAL, "HTTP requests answered with an error status");
    Ok(handle)
}

/// Middleware that increments request and error counters.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    // Label by route template so ids in paths do not explode cardinality.
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    let status = response.status();

    metrics::counter!(
        REQUESTS_TOTAL,
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    if status.is_server_error() || status.is_client_error() {
        metrics::counter!(ERRORS_TOTAL, "method" => method, "route" => route).increment(1);
    }

    response
}
