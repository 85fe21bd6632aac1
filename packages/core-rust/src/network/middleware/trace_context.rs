//! Request spans joined to the caller's distributed trace.

use axum::http::{HeaderMap, Request};
use opentelemetry::propagation::Extractor;
use tower_http::trace::MakeSpan;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::REQUEST_ID_HEADER;

/// Reads propagation fields (`traceparent`, `baggage`) from HTTP headers.
pub struct HeaderExtractor<'a>(pub &'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(axum::http::HeaderName::as_str).collect()
    }
}

/// `MakeSpan` that opens `http_request` and parents it on the inbound
/// W3C trace context via the global propagator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceContextSpan;

impl<B> MakeSpan<B> for TraceContextSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let span = tracing::info_span!(
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = %request_id,
            otel.kind = "server",
        );

        let parent = opentelemetry::global::get_text_map_propagator(|propagator| {
            propagator.extract(&HeaderExtractor(request.headers()))
        });
        span.set_parent(parent);
        span
    }
}
