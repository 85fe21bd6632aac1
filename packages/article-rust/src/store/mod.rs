//! Document-store adapters for articles.
//!
//! [`ArticleStore`] is the seam between the domain operations and the
//! backing store. The concrete adapter is picked from the connection URI by
//! [`connect_store`] and shared as `Arc<dyn ArticleStore>`.

mod memory;
mod mongo;

use std::sync::Arc;
use std::time::Duration;

use alpha_core::storage::uri_scheme;
use alpha_core::{ConnectionError, StoreError};
use async_trait::async_trait;

pub use memory::MemoryArticleStore;
pub use mongo::MongoArticleStore;

use crate::model::{Article, ArticleFilter};

/// Persistence contract for articles.
///
/// Absence is never an error: `get` returns `None` and `delete` of a missing
/// id succeeds.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Lists articles matching `filter`; `None` or an empty filter lists all.
    /// Order is unspecified.
    async fn list(&self, filter: Option<&ArticleFilter>) -> Result<Vec<Article>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Article>, StoreError>;

    /// Writes the whole article, creating it if absent.
    async fn put(&self, article: &Article) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Opens the adapter matching the URI scheme and checks it is reachable.
///
/// `mongodb://` and `mongodb+srv://` select MongoDB, `memory://` the
/// in-process store.
///
/// # Errors
///
/// Returns [`ConnectionError`] for an unknown scheme, an unparsable URI, or
/// a store that does not answer the liveness probe.
pub async fn connect_store(
    uri: &str,
    timeout: Duration,
) -> Result<Arc<dyn ArticleStore>, ConnectionError> {
    match uri_scheme(uri) {
        Some("mongodb" | "mongodb+srv") => {
            Ok(Arc::new(MongoArticleStore::connect(uri, timeout).await?))
        }
        Some("memory") => Ok(Arc::new(MemoryArticleStore::new(timeout))),
        _ => Err(ConnectionError::UnsupportedScheme {
            uri: uri.to_string(),
        }),
    }
}
