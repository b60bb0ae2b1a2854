//! # zkyc-api — HTTP Surface for the zKYC Commitment Stack
//!
//! Maps inbound HTTP calls onto the [`CommitmentService`](zkyc_commitment::CommitmentService)
//! and formats its results.
//!
//! ## API Surface
//!
//! | Path                        | Module                     |
//! |-----------------------------|----------------------------|
//! | `/api/proof/commit`         | [`routes::commitments`]    |
//! | `/api/commitment`           | [`routes::commitments`]    |
//! | `/api/commitment/{hash}`    | [`routes::commitments`]    |
//! | `/api/status`, `/metrics`   | [`routes::status`]         |
//! | `/health/*`                 | this module                |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → CatchPanicLayer → MetricsMiddleware → Handler
//! ```

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::commitments::router())
        .merge(routes::status::router())
        .route_layer(from_fn(middleware::metrics::metrics_middleware))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new()
        .merge(health)
        .merge(api)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
