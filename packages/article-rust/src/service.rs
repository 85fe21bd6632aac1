//! Article domain operations.

use std::sync::Arc;

use alpha_core::StoreError;

use crate::model::{Article, NewArticle};
use crate::store::ArticleStore;

/// Stateless translator between handlers and the injected [`ArticleStore`].
pub struct ArticleService {
    store: Arc<dyn ArticleStore>,
}

impl ArticleService {
    #[must_use]
    pub fn new(store: Arc<dyn ArticleStore>) -> Self {
        Self { store }
    }

    /// All articles, unfiltered, in store order.
    ///
    /// # Errors
    ///
    /// Propagates the store failure.
    pub async fn get_articles(&self) -> Result<Vec<Article>, StoreError> {
        self.store.list(None).await
    }

    /// Assigns the id if needed, writes the article and returns it as stored.
    ///
    /// # Errors
    ///
    /// Propagates the store failure.
    pub async fn add_article(&self, new: NewArticle) -> Result<Article, StoreError> {
        let article = new.into_article();
        self.store.put(&article).await?;
        tracing::debug!(article_id = %article.id, "article stored");
        Ok(article)
    }

    /// Removes the article; a missing id is not an error.
    ///
    /// # Errors
    ///
    /// Propagates the store failure.
    pub async fn delete_article(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(id).await
    }
}
