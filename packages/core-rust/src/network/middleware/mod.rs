//! HTTP middleware stack shared by every service.
//!
//! Middleware ordering follows the outer-to-inner convention: the first
//! layer listed is the outermost (processes the request first on the way
//! in, and the response last on the way out).

mod access_log;
mod cors;
mod recovery;
mod request_metrics;
mod trace_context;

use axum::http::header::HeaderName;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub use access_log::access_log;
pub use cors::build_cors_layer;
pub use recovery::panic_response;
pub use request_metrics::{record_request_metrics, RequestMetrics};
pub use trace_context::{HeaderExtractor, TraceContextSpan};

use super::config::NetworkConfig;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Wraps `router` in the HTTP middleware stack.
///
/// **Middleware ordering (outermost to innermost):**
/// 1. `SetRequestId` -- keeps an inbound `X-Request-Id` or assigns a UUID v4
/// 2. `Trace` -- opens the request span, parented on inbound W3C trace context
/// 3. `CORS` -- answers preflights and decorates responses per [`CorsPolicy`]
/// 4. `AccessLog` -- one `info` event per request
/// 5. `RequestMetrics` -- request counter and latency histogram
/// 6. `PropagateRequestId` -- copies `X-Request-Id` onto the response
/// 7. `CatchPanic` -- turns a handler panic into a 500 JSON response
///
/// Because recovery is innermost, the outer stages still log, count and
/// tag a panicked request as a 500.
///
/// [`CorsPolicy`]: super::config::CorsPolicy
pub fn apply_http_layers(router: Router, config: &NetworkConfig) -> Router {
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let metrics = RequestMetrics::new(&config.metrics_namespace);

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(TraceContextSpan))
            .layer(build_cors_layer(&config.cors))
            .layer(axum::middleware::from_fn(access_log))
            .layer(axum::middleware::from_fn_with_state(
                metrics,
                record_request_metrics,
            ))
            .layer(PropagateRequestIdLayer::new(x_request_id))
            .layer(CatchPanicLayer::custom(panic_response)),
    )
}
