//! Article service: catalog articles stored in a document store.

pub mod app;
pub mod handlers;
pub mod model;
pub mod service;
pub mod store;

use alpha_core::ServiceProfile;
use axum::http::Method;

pub use app::build_app;
pub use model::{Article, NewArticle};
pub use service::ArticleService;
pub use store::{connect_store, ArticleStore};

/// Defaults and fixed HTTP policy of the article service.
pub const PROFILE: ServiceProfile = ServiceProfile {
    name: "article-service",
    banner: "-= Article Service =-",
    default_listen: ":8080",
    default_store_uri: "mongodb://localhost:27017/alpha-articles",
    metrics_namespace: "article_srv_http",
    cors_methods: &[Method::GET, Method::POST, Method::DELETE],
};
