//! Alpha Core: the request pipeline shared by the article and cart services.
//!
//! Provides the error taxonomy, layered configuration, telemetry bootstrap,
//! store-call instrumentation, and the HTTP middleware chain every service
//! wraps its routes in.

pub mod config;
pub mod error;
pub mod extract;
pub mod network;
pub mod storage;
pub mod telemetry;

pub use config::{CommonArgs, ServiceProfile, Settings};
pub use error::{ApiError, ConnectionError, DecodeError, StoreError};
pub use extract::JsonBody;
pub use network::{NetworkConfig, NetworkModule};
