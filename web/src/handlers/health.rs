//! Health check and metrics endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use loket_core::reducer::Reducer;
use loket_runtime::{metrics::PrometheusMetrics, HealthCheck, HealthStatus, Store};
use std::sync::Arc;

/// Liveness endpoint.
///
/// Returns 200 OK while the process is running. Does not inspect the store.
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Readiness endpoint backed by [`Store::health`].
///
/// - 200 OK: Healthy
/// - 503 Service Unavailable: Unhealthy (e.g., shutting down)
///
/// ```text
/// GET /ready
/// ```
///
/// ```json
/// {
///   "component": "store",
///   "status": "healthy",
///   "metadata": [["pending_effects", "0"], ["cancellable_effects", "0"]],
///   "checked_at": "2025-01-01T00:00:00Z"
/// }
/// ```
pub async fn health_check_with_store<S, A, E, R>(
    State(store): State<Arc<Store<S, A, E, R>>>,
) -> (StatusCode, Json<HealthCheck>)
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    S: Send + Sync + 'static,
    A: Send + Clone + 'static,
    E: Send + Sync + 'static,
{
    let health = store.health();

    let status = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(health))
}

/// Render Prometheus metrics in the text exposition format.
///
/// ```text
/// GET /metrics
/// ```
#[must_use]
pub fn render_metrics(metrics: &PrometheusMetrics) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics.render(),
    )
        .into_response()
}
