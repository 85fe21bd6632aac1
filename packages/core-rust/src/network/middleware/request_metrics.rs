//! Per-request Prometheus samples.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

/// Paths excluded from the request metric population.
const SKIPPED_PATHS: [&str; 2] = ["/metrics", "/healthz"];

/// `path` label for requests that matched no route.
const UNMATCHED_PATH: &str = "unmatched";

/// Metric names for one service, derived from its namespace.
#[derive(Debug, Clone)]
pub struct RequestMetrics {
    names: Arc<MetricNames>,
}

#[derive(Debug)]
struct MetricNames {
    requests_total: String,
    request_duration: String,
}

impl RequestMetrics {
    #[must_use]
    pub fn new(namespace: &str) -> Self {
        Self {
            names: Arc::new(MetricNames {
                requests_total: format!("{namespace}_requests_total"),
                request_duration: format!("{namespace}_request_duration_seconds"),
            }),
        }
    }

    #[must_use]
    pub fn requests_total(&self) -> &str {
        &self.names.requests_total
    }

    #[must_use]
    pub fn request_duration(&self) -> &str {
        &self.names.request_duration
    }
}

/// Counts the request and records its latency, labelled by method, route
/// template and status.
pub async fn record_request_metrics(
    State(names): State<RequestMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let raw_path = request.uri().path();
    if SKIPPED_PATHS.contains(&raw_path) {
        return next.run(request).await;
    }

    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED_PATH, MatchedPath::as_str)
        .to_owned();
    let method = request.method().to_string();

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();

    let labels = [
        ("method", method),
        ("path", path),
        ("status", response.status().as_u16().to_string()),
    ];
    metrics::counter!(names.requests_total().to_owned(), &labels).increment(1);
    metrics::histogram!(names.request_duration().to_owned(), &labels).record(elapsed);

    response
}
