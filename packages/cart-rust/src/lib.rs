//! Cart service: per-user shopping carts stored in a key-value store.

pub mod app;
pub mod handlers;
pub mod model;
pub mod service;
pub mod store;

use alpha_core::ServiceProfile;
use axum::http::Method;

pub use app::build_app;
pub use model::Cart;
pub use service::CartService;
pub use store::{connect_store, CartStore};

/// Defaults and fixed HTTP policy of the cart service.
pub const PROFILE: ServiceProfile = ServiceProfile {
    name: "cart-service",
    banner: "-= Cart service =-",
    default_listen: ":8081",
    default_store_uri: "redis://localhost:6379",
    metrics_namespace: "cart_srv_http",
    cors_methods: &[Method::GET, Method::PUT, Method::DELETE],
};
