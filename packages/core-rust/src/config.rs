//! Layered service configuration.
//!
//! Precedence, lowest to highest: the per-service [`ServiceProfile`]
//! defaults, the YAML config file, then environment variables / CLI flags.
//! Key names are case-consistent across all three layers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::http::Method;
use clap::builder::BoolishValueParser;
use clap::Args;
use serde::Deserialize;

use crate::network::{CorsPolicy, NetworkConfig};
use crate::telemetry::{LogFormat, TelemetryConfig};

/// Compile-time defaults and fixed policy for one service binary.
#[derive(Debug, Clone)]
pub struct ServiceProfile {
    /// Default service name, also used for `/etc/<name>/config.yaml`.
    pub name: &'static str,
    /// Banner logged once at startup.
    pub banner: &'static str,
    pub default_listen: &'static str,
    pub default_store_uri: &'static str,
    /// Prefix for the HTTP request metrics.
    pub metrics_namespace: &'static str,
    /// Methods the CORS policy allows for this service.
    pub cors_methods: &'static [Method],
}

/// Flags and environment variables shared by both services.
///
/// The store URI is service-specific and declared by each binary next to
/// this struct (`#[command(flatten)]`).
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Path to the YAML config file.
    #[arg(long = "config", env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,
    /// Listen address, `:port` or `host:port`.
    #[arg(long, env = "LISTEN")]
    pub listen: Option<String>,
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,
    /// `json` or `pretty`.
    #[arg(long, env = "LOG_FORMAT")]
    pub log_format: Option<String>,
    #[arg(long, env = "SERVICE_NAME")]
    pub service_name: Option<String>,
    #[arg(long, env = "ENABLE_TRACING", value_parser = BoolishValueParser::new())]
    pub enable_tracing: Option<bool>,
    /// OTLP gRPC collector endpoint.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otel_endpoint: Option<String>,
    #[arg(long, env = "INSECURE_MODE", value_parser = BoolishValueParser::new())]
    pub insecure_mode: Option<bool>,
    #[arg(long, env = "STORE_TIMEOUT_MS")]
    pub store_timeout_ms: Option<u64>,
    /// Comma-separated list of allowed CORS origins; `*` mirrors any origin.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,
}

/// Contents of the YAML config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileSettings {
    pub listen: Option<String>,
    #[serde(alias = "mongodbUri", alias = "redisUri")]
    pub store_uri: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub service_name: Option<String>,
    pub enable_tracing: Option<bool>,
    pub otel_endpoint: Option<String>,
    pub insecure_mode: Option<bool>,
    pub store_timeout_ms: Option<u64>,
    pub cors_origins: Option<Vec<String>>,
}

/// Where the file layer came from, reported once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults { searched: Vec<PathBuf> },
}

/// Fully resolved settings for one service process.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store_uri: String,
    pub store_timeout: Duration,
    pub network: NetworkConfig,
    pub telemetry: TelemetryConfig,
    pub source: ConfigSource,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid listen address {value:?}: expected `:port` or `host:port`")]
    InvalidListen { value: String },
    #[error("invalid log format {value:?}: expected `json` or `pretty`")]
    InvalidLogFormat { value: String },
}

const DEFAULT_CONFIG_FILE: &str = "config.yaml";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_OTEL_ENDPOINT: &str = "localhost:4317";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;

impl Settings {
    /// Loads the config file (if any) and resolves all layers.
    ///
    /// `store_uri` is the service-specific flag/env value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file exists but cannot be read or
    /// parsed, or if a resolved value is invalid.
    pub fn load(
        profile: &ServiceProfile,
        args: &CommonArgs,
        store_uri: Option<String>,
    ) -> Result<Self, ConfigError> {
        let searched = candidate_files(profile, args);
        let found = searched.iter().find(|path| path.is_file()).cloned();

        let (file, source) = match found {
            Some(path) => (read_file(&path)?, ConfigSource::File(path)),
            None => (FileSettings::default(), ConfigSource::Defaults { searched }),
        };

        Self::resolve(profile, args, store_uri, file, source)
    }

    /// Merges the three layers without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the listen address or log format is invalid.
    pub fn resolve(
        profile: &ServiceProfile,
        args: &CommonArgs,
        store_uri: Option<String>,
        file: FileSettings,
        source: ConfigSource,
    ) -> Result<Self, ConfigError> {
        let listen = args
            .listen
            .clone()
            .or(file.listen)
            .unwrap_or_else(|| profile.default_listen.to_string());
        let (host, port) = parse_listen(&listen)?;

        let service_name = args
            .service_name
            .clone()
            .or(file.service_name)
            .unwrap_or_else(|| profile.name.to_string());

        let log_format = args
            .log_format
            .clone()
            .or(file.log_format)
            .map_or(Ok(LogFormat::Json), |value| value.parse())?;

        let telemetry = TelemetryConfig {
            service_name: service_name.clone(),
            log_level: args
                .log_level
                .clone()
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_format,
            tracing_enabled: args.enable_tracing.or(file.enable_tracing).unwrap_or(false),
            otel_endpoint: args
                .otel_endpoint
                .clone()
                .or(file.otel_endpoint)
                .unwrap_or_else(|| DEFAULT_OTEL_ENDPOINT.to_string()),
            insecure: args.insecure_mode.or(file.insecure_mode).unwrap_or(true),
        };

        let cors = CorsPolicy {
            allow_origins: args
                .cors_origins
                .clone()
                .or(file.cors_origins)
                .unwrap_or_else(|| vec!["*".to_string()]),
            ..CorsPolicy::with_methods(profile.cors_methods)
        };

        let network = NetworkConfig {
            host,
            port,
            service_name,
            metrics_namespace: profile.metrics_namespace.to_string(),
            cors,
        };

        let store_timeout_ms = args
            .store_timeout_ms
            .or(file.store_timeout_ms)
            .unwrap_or(DEFAULT_STORE_TIMEOUT_MS);

        Ok(Self {
            store_uri: store_uri
                .or(file.store_uri)
                .unwrap_or_else(|| profile.default_store_uri.to_string()),
            store_timeout: Duration::from_millis(store_timeout_ms),
            network,
            telemetry,
            source,
        })
    }
}

/// Explicit `--config` path first, then `config.yaml` in the working
/// directory, then `/etc/<service>/config.yaml`.
fn candidate_files(profile: &ServiceProfile, args: &CommonArgs) -> Vec<PathBuf> {
    match &args.config_file {
        Some(path) => vec![path.clone()],
        None => vec![
            PathBuf::from(DEFAULT_CONFIG_FILE),
            Path::new("/etc").join(profile.name).join(DEFAULT_CONFIG_FILE),
        ],
    }
}

fn read_file(path: &Path) -> Result<FileSettings, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if raw.trim().is_empty() {
        return Ok(FileSettings::default());
    }
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses `:8080` (all interfaces) or `host:8080`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidListen`] when no valid port is present.
pub fn parse_listen(value: &str) -> Result<(String, u16), ConfigError> {
    let invalid = || ConfigError::InvalidListen {
        value: value.to_string(),
    };
    let (host, port) = value.rsplit_once(':').ok_or_else(invalid)?;
    let port: u16 = port.parse().map_err(|_| invalid())?;
    let host = match host.trim_start_matches('[').trim_end_matches(']') {
        "" => "0.0.0.0",
        host => host,
    };
    Ok((host.to_string(), port))
}
