//! HTTP handlers for the article routes.

use std::sync::Arc;

use alpha_core::{ApiError, JsonBody};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::model::{Article, NewArticle};
use crate::service::ArticleService;

#[derive(Debug, Serialize)]
pub struct ArticlesResponse {
    pub articles: Vec<Article>,
}

/// `GET /article/`
pub async fn get_articles(
    State(service): State<Arc<ArticleService>>,
) -> Result<Json<ArticlesResponse>, ApiError> {
    let articles = service
        .get_articles()
        .await
        .map_err(|err| ApiError::store("GetArticles", err))?;
    Ok(Json(ArticlesResponse { articles }))
}

/// `POST /article/`
pub async fn add_article(
    State(service): State<Arc<ArticleService>>,
    JsonBody(new): JsonBody<NewArticle>,
) -> Result<StatusCode, ApiError> {
    service
        .add_article(new)
        .await
        .map_err(|err| ApiError::store("AddArticle", err))?;
    Ok(StatusCode::ACCEPTED)
}

/// `DELETE /article/{article_id}/`
pub async fn delete_article(
    State(service): State<Arc<ArticleService>>,
    Path(article_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service
        .delete_article(&article_id)
        .await
        .map_err(|err| ApiError::store_for("DeleteArticle", "articleId", article_id, err))?;
    Ok(StatusCode::ACCEPTED)
}
