//! Liveness and metrics-scrape endpoint handlers.
//!
//! These handlers are mounted on every service next to its domain routes.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

/// Content type of the Prometheus text exposition format.
const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Liveness probe -- always returns 200 `ok`.
///
/// Does not check the backing store: the process refuses to start without
/// it, and a failed liveness probe triggers a restart.
pub async fn liveness_handler() -> &'static str {
    "ok"
}

/// Renders every metric from the process-wide recorder.
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        handle.render(),
    )
}
