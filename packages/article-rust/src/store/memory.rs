//! In-process [`ArticleStore`] backed by [`DashMap`].
//!
//! Selected by a `memory://` URI for local runs and tests. Contents are lost
//! when the process exits.

use std::time::Duration;

use alpha_core::storage::{observe, StoreCall};
use alpha_core::StoreError;
use async_trait::async_trait;
use dashmap::DashMap;

use super::ArticleStore;
use crate::model::{Article, ArticleFilter};

const STORE_LABEL: &str = "memory";

pub struct MemoryArticleStore {
    articles: DashMap<String, Article>,
    timeout: Duration,
}

impl MemoryArticleStore {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            articles: DashMap::new(),
            timeout,
        }
    }

    fn call(&self, operation: &'static str) -> StoreCall {
        StoreCall {
            store: STORE_LABEL,
            operation,
            timeout: self.timeout,
        }
    }
}

impl Default for MemoryArticleStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn list(&self, filter: Option<&ArticleFilter>) -> Result<Vec<Article>, StoreError> {
        observe(self.call("list"), async {
            Ok(self
                .articles
                .iter()
                .filter(|entry| filter.is_none_or(|filter| entry.value().matches(filter)))
                .map(|entry| entry.value().clone())
                .collect())
        })
        .await
    }

    async fn get(&self, id: &str) -> Result<Option<Article>, StoreError> {
        observe(self.call("get"), async {
            Ok(self.articles.get(id).map(|entry| entry.value().clone()))
        })
        .await
    }

    async fn put(&self, article: &Article) -> Result<(), StoreError> {
        observe(self.call("put"), async {
            self.articles.insert(article.id.clone(), article.clone());
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        observe(self.call("delete"), async {
            self.articles.remove(id);
            Ok(())
        })
        .await
    }
}
