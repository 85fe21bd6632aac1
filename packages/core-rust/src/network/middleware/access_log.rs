use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use super::REQUEST_ID_HEADER;

/// Paths polled by probes and scrapers.
const SKIPPED_PATHS: [&str; 3] = ["/", "/healthz", "/metrics"];

/// Emits one `info` event per completed request.
pub async fn access_log(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if SKIPPED_PATHS.contains(&path.as_str()) {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    let start = Instant::now();
    let response = next.run(request).await;
    let latency_ms = start.elapsed().as_secs_f64() * 1_000.0;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms,
        request_id = %request_id,
        "request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    use crate::network::{apply_http_layers, base_routes, NetworkConfig};
    use crate::telemetry::metrics::install_recorder;

    fn app() -> Router {
        let router = Router::new()
            .route("/cart/{id}/", get(|| async { "cart" }))
            .merge(base_routes(install_recorder().unwrap()));
        apply_http_layers(router, &NetworkConfig::default())
    }

    async fn send(app: &Router, uri: &str) {
        let response = app
            .clone()
            .oneshot(
                axum::http::Request::get(uri)
                    .header(REQUEST_ID_HEADER, "req-7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    #[tokio::test]
    #[traced_test]
    async fn logs_domain_request_fields() {
        send(&app(), "/cart/42/").await;

        logs_assert(|lines: &[&str]| {
            let completed: Vec<&&str> = lines
                .iter()
                .filter(|line| line.contains("request completed"))
                .collect();
            match completed.as_slice() {
                [line] => {
                    for field in [
                        "method=GET",
                        "path=/cart/42/",
                        "status=200",
                        "latency_ms=",
                        "request_id=req-7",
                    ] {
                        if !line.contains(field) {
                            return Err(format!("missing {field} in {line}"));
                        }
                    }
                    Ok(())
                }
                other => Err(format!("expected one access log line, got {other:?}")),
            }
        });
    }

    #[tokio::test]
    #[traced_test]
    async fn health_and_metrics_paths_are_not_logged() {
        let app = app();
        for uri in ["/", "/healthz", "/metrics"] {
            send(&app, uri).await;
        }

        assert!(!logs_contain("request completed"));
    }
}
