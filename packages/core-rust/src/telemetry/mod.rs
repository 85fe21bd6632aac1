//! Telemetry bootstrap: structured logging, distributed tracing, metrics.
//!
//! [`init`] installs the global `tracing` subscriber (JSON or pretty `fmt`
//! layer behind an `EnvFilter`) and, when tracing is enabled, an
//! OpenTelemetry layer exporting spans over OTLP. The W3C propagator is
//! always installed so inbound trace context is honoured either way.

pub mod metrics;
mod otel;

use std::str::FromStr;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::ConfigError;

/// Output format of the `fmt` layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            _ => Err(ConfigError::InvalidLogFormat {
                value: value.to_string(),
            }),
        }
    }
}

/// Logging and tracing settings resolved from config.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub tracing_enabled: bool,
    /// OTLP gRPC collector endpoint, with or without scheme.
    pub otel_endpoint: String,
    /// Export over plaintext instead of TLS.
    pub insecure: bool,
}

/// Keeps the tracer provider alive; flushes and shuts it down on drop.
#[must_use = "dropping the guard shuts down span export"]
pub struct TelemetryGuard {
    tracing_enabled: bool,
}

impl TelemetryGuard {
    #[must_use]
    pub fn tracing_enabled(&self) -> bool {
        self.tracing_enabled
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if self.tracing_enabled {
            opentelemetry::global::shutdown_tracer_provider();
        }
    }
}

/// Installs the global subscriber and propagator.
///
/// # Errors
///
/// Fails if the log level is not a valid filter directive, the OTLP exporter
/// cannot be built, or a global subscriber is already installed.
pub fn init(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    otel::install_propagator();

    let filter = EnvFilter::try_new(&config.log_level)?;

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    let otel_layer = if config.tracing_enabled {
        let tracer = otel::build_tracer(config)?;
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(otel_layer)
        .with(filter)
        .try_init()?;

    Ok(TelemetryGuard {
        tracing_enabled: config.tracing_enabled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("logfmt".parse::<LogFormat>().is_err());
    }

    #[test]
    fn guard_reports_tracing_state() {
        let guard = TelemetryGuard {
            tracing_enabled: false,
        };
        assert!(!guard.tracing_enabled());
    }
}
