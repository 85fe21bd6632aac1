//! Network module with deferred startup lifecycle.
//!
//! Implements the deferred startup pattern: `new()` keeps the config,
//! `start()` binds the TCP listener, and `serve()` starts accepting
//! connections. Binding before the router exists lets a bind failure abort
//! startup early and lets tests learn an OS-assigned port.

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use super::config::NetworkConfig;
use super::middleware::apply_http_layers;

/// Manages the HTTP server lifecycle for one service.
///
/// 1. `new()` -- stores the configuration
/// 2. `start()` -- binds TCP listener to the configured address
/// 3. `serve()` -- wraps the router in the middleware stack and accepts
///    connections until shutdown is signalled
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            listener: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which may differ from the configured
    /// port when port 0 is used (OS-assigned ephemeral port).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!(
            service = %self.config.service_name,
            "TCP listener bound to {}:{}", self.config.host, port
        );

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves `router` behind the HTTP middleware stack until `shutdown`
    /// resolves, then lets in-flight requests finish.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first or the server
    /// hits a fatal I/O error.
    pub async fn serve(
        self,
        router: Router,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let Some(listener) = self.listener else {
            anyhow::bail!("start() must be called before serve()");
        };

        let app = apply_http_layers(router, &self.config);

        info!("Serving HTTP connections");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}
