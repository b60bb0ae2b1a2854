//! # Status & Metrics
//!
//! Operator endpoints outside the commitment protocol.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// `GET /api/status` response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Always `"OK"` while the process serves requests.
    pub status: &'static str,
    /// Milliseconds since the server started.
    pub uptime: u64,
    /// Current time, Unix milliseconds.
    pub timestamp: i64,
    /// Ledger gateway name.
    pub ledger: String,
}

/// Build the status router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/status", get(status))
        .route("/metrics", get(prometheus))
}

/// GET /api/status
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "OK",
        uptime: u64::try_from(state.started_at.elapsed().as_millis()).unwrap_or(u64::MAX),
        timestamp: chrono::Utc::now().timestamp_millis(),
        ledger: state.service.ledger_name().to_string(),
    })
}

/// GET /metrics: Prometheus text exposition.
async fn prometheus(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
