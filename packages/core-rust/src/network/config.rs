//! Network configuration types shared by the service binaries.

use std::time::Duration;

use axum::http::header::{self, HeaderName};
use axum::http::Method;

/// Listener and HTTP pipeline configuration for one service.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Bind address for the server.
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    pub port: u16,
    /// Service name, attached to startup logs.
    pub service_name: String,
    /// Prefix of the request metrics (`<ns>_requests_total`).
    pub metrics_namespace: String,
    /// Cross-origin policy applied by the CORS stage.
    pub cors: CorsPolicy,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            service_name: "alpha-service".to_string(),
            metrics_namespace: "alpha_http".to_string(),
            cors: CorsPolicy::default(),
        }
    }
}

/// Cross-origin resource sharing policy.
///
/// `allow_origins` containing `"*"` mirrors whatever origin the request
/// carries; otherwise only the listed origins are allowed.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<Method>,
    pub allow_headers: Vec<HeaderName>,
    pub expose_headers: Vec<HeaderName>,
    pub allow_credentials: bool,
    /// How long browsers may cache a preflight response.
    pub max_age: Duration,
}

/// Request headers browsers may send cross-origin.
pub const ALLOWED_HEADERS: [HeaderName; 9] = [
    header::CONTENT_TYPE,
    header::CONTENT_LENGTH,
    header::ACCEPT_ENCODING,
    HeaderName::from_static("x-csrf-token"),
    header::AUTHORIZATION,
    header::ACCEPT,
    header::ORIGIN,
    header::CACHE_CONTROL,
    HeaderName::from_static("x-requested-with"),
];

impl CorsPolicy {
    /// Permissive policy allowing the given methods from any origin.
    #[must_use]
    pub fn with_methods(methods: &[Method]) -> Self {
        Self {
            allow_origins: vec!["*".to_string()],
            allow_methods: methods.to_vec(),
            allow_headers: ALLOWED_HEADERS.to_vec(),
            expose_headers: vec![header::CONTENT_LENGTH],
            allow_credentials: true,
            max_age: Duration::from_secs(12 * 60 * 60),
        }
    }

    /// Whether any origin is mirrored back.
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.allow_origins.iter().any(|origin| origin == "*")
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::with_methods(&[Method::GET])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_config_defaults() {
        let config = NetworkConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 0);
        assert_eq!(config.metrics_namespace, "alpha_http");
        assert!(config.cors.allows_any_origin());
    }

    #[test]
    fn cors_policy_with_methods() {
        let policy = CorsPolicy::with_methods(&[Method::GET, Method::POST, Method::DELETE]);
        assert_eq!(
            policy.allow_methods,
            vec![Method::GET, Method::POST, Method::DELETE]
        );
        assert_eq!(policy.allow_headers.len(), 9);
        assert_eq!(policy.expose_headers, vec![header::CONTENT_LENGTH]);
        assert!(policy.allow_credentials);
        assert_eq!(policy.max_age, Duration::from_secs(43_200));
    }

    #[test]
    fn explicit_origins_disable_mirroring() {
        let policy = CorsPolicy {
            allow_origins: vec!["https://shop.example".to_string()],
            ..CorsPolicy::default()
        };
        assert!(!policy.allows_any_origin());
    }
}
