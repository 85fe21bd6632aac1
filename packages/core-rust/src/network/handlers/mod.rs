//! Routes every service exposes regardless of its domain.

pub mod health;

pub use health::{liveness_handler, metrics_handler};

use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;

/// `GET /`, `GET /healthz` and `GET /metrics`.
///
/// Merged into each service router before the middleware stack is applied.
pub fn base_routes(handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/", get(liveness_handler))
        .route("/healthz", get(liveness_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::telemetry::metrics::install_recorder;

    #[tokio::test]
    async fn probes_answer_ok() {
        let router = base_routes(install_recorder().unwrap());
        for uri in ["/", "/healthz"] {
            let response = router
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            assert_eq!(&body[..], b"ok");
        }
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let router = base_routes(install_recorder().unwrap());
        let response = router
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
