//! HTTP plumbing: configuration, middleware, shared routes, listener lifecycle.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod shutdown;

pub use config::*;
pub use handlers::base_routes;
pub use middleware::apply_http_layers;
pub use module::NetworkModule;
pub use shutdown::shutdown_signal;
