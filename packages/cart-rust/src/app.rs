//! Router assembly for the cart service.

use std::sync::Arc;

use alpha_core::network::base_routes;
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::handlers;
use crate::service::CartService;

/// Cart routes plus the shared `/`, `/healthz` and `/metrics` routes.
pub fn build_app(service: Arc<CartService>, metrics: PrometheusHandle) -> Router {
    Router::new()
        .route(
            "/cart/{cart_id}/",
            get(handlers::get_cart)
                .put(handlers::update_cart)
                .delete(handlers::delete_cart),
        )
        .with_state(service)
        .merge(base_routes(metrics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpha_core::network::{apply_http_layers, CorsPolicy};
    use alpha_core::telemetry::metrics::install_recorder;
    use alpha_core::{NetworkConfig, StoreError};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::model::Cart;
    use crate::store::{CartStore, MemoryCartStore};
    use crate::PROFILE;

    struct FailingStore;

    #[async_trait]
    impl CartStore for FailingStore {
        async fn get(&self, _id: &str) -> Result<Option<Cart>, StoreError> {
            Err(StoreError::Timeout {
                operation: "get",
                timeout_ms: 5000,
            })
        }

        async fn put(&self, _cart: &Cart) -> Result<(), StoreError> {
            Err(StoreError::backend("put", "READONLY replica"))
        }

        async fn delete(&self, _id: &str) -> Result<(), StoreError> {
            Err(StoreError::backend("delete", "connection reset"))
        }
    }

    fn app_with(store: Arc<dyn CartStore>) -> Router {
        let config = NetworkConfig {
            metrics_namespace: PROFILE.metrics_namespace.to_string(),
            cors: CorsPolicy::with_methods(PROFILE.cors_methods),
            ..NetworkConfig::default()
        };
        let router = build_app(
            Arc::new(CartService::new(store)),
            install_recorder().unwrap(),
        );
        apply_http_layers(router, &config)
    }

    fn app() -> Router {
        app_with(Arc::new(MemoryCartStore::default()))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_cart(id: &str) -> Request<Body> {
        Request::get(format!("/cart/{id}/")).body(Body::empty()).unwrap()
    }

    fn put_cart(id: &str, body: &str) -> Request<Body> {
        Request::put(format!("/cart/{id}/"))
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn delete_cart(id: &str) -> Request<Body> {
        Request::delete(format!("/cart/{id}/"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn unknown_cart_reads_as_empty() {
        let (status, body) = send(&app(), get_cart("u-1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "cart": { "id": "u-1", "items": [] } }));
    }

    #[tokio::test]
    async fn update_then_get_returns_items() {
        let app = app();
        let (status, _) = send(&app, put_cart("u-1", r#"{"items":["apple","apple","pear"]}"#)).await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let (_, body) = send(&app, get_cart("u-1")).await;
        assert_eq!(
            body,
            json!({ "cart": { "id": "u-1", "items": ["apple", "apple", "pear"] } })
        );
    }

    #[tokio::test]
    async fn update_replaces_previous_items() {
        let app = app();
        send(&app, put_cart("u-1", r#"{"items":["apple"]}"#)).await;
        send(&app, put_cart("u-1", r#"{"items":["plum"]}"#)).await;

        let (_, body) = send(&app, get_cart("u-1")).await;
        assert_eq!(body["cart"]["items"], json!(["plum"]));
    }

    #[tokio::test]
    async fn malformed_body_is_400_and_cart_unchanged() {
        let app = app();
        send(&app, put_cart("u-1", r#"{"items":["apple"]}"#)).await;

        for payload in ["{not json", "", r#"{"items":[1,2]}"#, r#"{"items":null}"#] {
            let (status, body) = send(&app, put_cart("u-1", payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload:?}");
            assert!(body["error"].is_string());
        }

        let (_, body) = send(&app, get_cart("u-1")).await;
        assert_eq!(body["cart"]["items"], json!(["apple"]));
    }

    #[tokio::test]
    async fn delete_twice_then_get_is_empty() {
        let app = app();
        send(&app, put_cart("u-1", r#"{"items":["apple"]}"#)).await;

        for _ in 0..2 {
            let (status, _) = send(&app, delete_cart("u-1")).await;
            assert_eq!(status, StatusCode::ACCEPTED);
        }

        let (_, body) = send(&app, get_cart("u-1")).await;
        assert_eq!(body, json!({ "cart": { "id": "u-1", "items": [] } }));
    }

    #[tokio::test]
    async fn store_failures_are_500() {
        let app = app_with(Arc::new(FailingStore));

        let (status, body) = send(&app, get_cart("u-1")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "get timed out after 5000ms" }));

        let (status, body) = send(&app, put_cart("u-1", r#"{"items":[]}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "put: READONLY replica" }));

        let (status, body) = send(&app, delete_cart("u-1")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "delete: connection reset", "cartId": "u-1" })
        );
    }

    #[tokio::test]
    async fn probes_are_excluded_from_request_metrics() {
        let handle = install_recorder().unwrap();
        let app = app();

        for _ in 0..10 {
            let (status, _) = send(
                &app,
                Request::get("/healthz").body(Body::empty()).unwrap(),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
        send(&app, get_cart("metrics-probe")).await;

        let rendered = handle.render();
        let request_lines: Vec<&str> = rendered
            .lines()
            .filter(|line| line.starts_with("cart_srv_http_requests_total{"))
            .collect();

        assert!(request_lines
            .iter()
            .any(|line| line.contains(r#"path="/cart/{cart_id}/""#)));
        assert!(request_lines
            .iter()
            .all(|line| !line.contains("/healthz") && !line.contains("/metrics")));
    }

    #[tokio::test]
    async fn preflight_allows_cart_methods() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/cart/u-1/")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET,PUT,DELETE"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
    }
}
