//! # Application State
//!
//! Shared state for the Axum application: the commitment service, the
//! process start instant, and the Prometheus handle when one is installed.

use std::sync::Arc;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusHandle;
use zkyc_commitment::CommitmentService;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CommitmentService>,
    pub started_at: Instant,
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.service)
            .field("started_at", &self.started_at)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    /// Create state around a service, without a metrics recorder.
    pub fn new(service: CommitmentService) -> Self {
        Self {
            service: Arc::new(service),
            started_at: Instant::now(),
            metrics: None,
        }
    }

    /// Attach the Prometheus handle rendered by `GET /metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
