//! OpenTelemetry wiring: W3C propagation and the OTLP span exporter.

use opentelemetry::propagation::TextMapCompositePropagator;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use opentelemetry_sdk::trace::{self as sdktrace, Sampler};
use opentelemetry_sdk::Resource;
use tonic::transport::ClientTlsConfig;

use super::TelemetryConfig;

/// Installs TraceContext + Baggage as the global text-map propagator.
pub(crate) fn install_propagator() {
    opentelemetry::global::set_text_map_propagator(TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ]));
}

/// Builds a batch-exporting tracer and registers its provider globally.
pub(crate) fn build_tracer(config: &TelemetryConfig) -> anyhow::Result<sdktrace::Tracer> {
    let endpoint = collector_url(&config.otel_endpoint, config.insecure);

    let mut exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint);
    if !config.insecure {
        exporter = exporter.with_tls_config(ClientTlsConfig::new());
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("library.language", "rust"),
    ]);

    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(
            sdktrace::config()
                .with_sampler(Sampler::AlwaysOn)
                .with_resource(resource),
        )
        .install_batch(opentelemetry_sdk::runtime::Tokio)?;

    Ok(tracer)
}

/// Collectors are usually configured as bare `host:port`; tonic needs a scheme.
fn collector_url(endpoint: &str, insecure: bool) -> String {
    if endpoint.contains("://") {
        endpoint.to_string()
    } else if insecure {
        format!("http://{endpoint}")
    } else {
        format!("https://{endpoint}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_url_adds_scheme_from_security_mode() {
        assert_eq!(collector_url("otel:4317", true), "http://otel:4317");
        assert_eq!(collector_url("otel:4317", false), "https://otel:4317");
        assert_eq!(
            collector_url("http://otel:4317", false),
            "http://otel:4317"
        );
    }
}
