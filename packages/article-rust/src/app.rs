//! Router assembly for the article service.

use std::sync::Arc;

use alpha_core::network::base_routes;
use axum::routing::{delete, get};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::handlers;
use crate::service::ArticleService;

/// Article routes plus the shared `/`, `/healthz` and `/metrics` routes.
///
/// The middleware stack is applied by `NetworkModule::serve`.
pub fn build_app(service: Arc<ArticleService>, metrics: PrometheusHandle) -> Router {
    Router::new()
        .route(
            "/article/",
            get(handlers::get_articles).post(handlers::add_article),
        )
        .route("/article/{article_id}/", delete(handlers::delete_article))
        .with_state(service)
        .merge(base_routes(metrics))
}
