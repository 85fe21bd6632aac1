//! MongoDB [`ArticleStore`].
//!
//! Articles live in the `articles` collection of the URI's default database.
//! The article id is the document `_id`; every other field is stored as-is.

use std::time::Duration;

use alpha_core::storage::{observe, StoreCall};
use alpha_core::{ConnectionError, StoreError};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, bson, doc, Bson, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde_json::Value;

use super::ArticleStore;
use crate::model::{Article, ArticleFilter};

const STORE_LABEL: &str = "mongodb";
const DEFAULT_DATABASE: &str = "alpha-articles";
const COLLECTION: &str = "articles";
const APP_NAME: &str = "article-service";

pub struct MongoArticleStore {
    collection: Collection<Document>,
    timeout: Duration,
}

impl MongoArticleStore {
    /// Parses `uri`, builds the client and pings the database.
    ///
    /// # Errors
    ///
    /// [`ConnectionError::InvalidUri`] when the URI cannot be parsed,
    /// [`ConnectionError::Unreachable`] when the ping fails.
    pub async fn connect(uri: &str, timeout: Duration) -> Result<Self, ConnectionError> {
        let invalid = |err: mongodb::error::Error| ConnectionError::InvalidUri {
            uri: uri.to_string(),
            message: err.to_string(),
        };

        let mut options = ClientOptions::parse(uri).await.map_err(invalid)?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options).map_err(invalid)?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|err| ConnectionError::Unreachable {
                uri: uri.to_string(),
                message: err.to_string(),
            })?;

        tracing::debug!(database = %database.name(), collection = COLLECTION, "mongodb ping ok");

        Ok(Self {
            collection: database.collection(COLLECTION),
            timeout,
        })
    }

    fn call(&self, operation: &'static str) -> StoreCall {
        StoreCall {
            store: STORE_LABEL,
            operation,
            timeout: self.timeout,
        }
    }
}

#[async_trait]
impl ArticleStore for MongoArticleStore {
    async fn list(&self, filter: Option<&ArticleFilter>) -> Result<Vec<Article>, StoreError> {
        observe(self.call("list"), async {
            let query = match filter {
                Some(filter) => filter_document(filter)?,
                None => Document::new(),
            };
            let documents: Vec<Document> = self
                .collection
                .find(query)
                .await
                .map_err(|err| StoreError::backend("list", err))?
                .try_collect()
                .await
                .map_err(|err| StoreError::backend("list", err))?;

            documents.into_iter().map(from_document).collect()
        })
        .await
    }

    async fn get(&self, id: &str) -> Result<Option<Article>, StoreError> {
        observe(self.call("get"), async {
            self.collection
                .find_one(id_filter(id))
                .await
                .map_err(|err| StoreError::backend("get", err))?
                .map(from_document)
                .transpose()
        })
        .await
    }

    async fn put(&self, article: &Article) -> Result<(), StoreError> {
        observe(self.call("put"), async {
            let document = to_document(article)?;
            self.collection
                .replace_one(doc! { "_id": article.id.as_str() }, document)
                .upsert(true)
                .await
                .map_err(|err| StoreError::backend("put", err))?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        observe(self.call("delete"), async {
            self.collection
                .delete_one(id_filter(id))
                .await
                .map_err(|err| StoreError::backend("delete", err))?;
            Ok(())
        })
        .await
    }
}

// ---------------------------------------------------------------------------
// BSON conversion
// ---------------------------------------------------------------------------

fn to_document(article: &Article) -> Result<Document, StoreError> {
    let mut document =
        bson::to_document(&article.fields).map_err(|err| StoreError::backend("put", err))?;
    document.insert("_id", article.id.as_str());
    Ok(document)
}

fn filter_document(filter: &ArticleFilter) -> Result<Document, StoreError> {
    let mut document =
        bson::to_document(filter).map_err(|err| StoreError::backend("list", err))?;
    if let Some(id) = document.remove("id") {
        let id = match id {
            Bson::String(id) => id_match(&id),
            other => other,
        };
        document.insert("_id", id);
    }
    Ok(document)
}

/// Selects the document whose `_id` is `id`.
fn id_filter(id: &str) -> Document {
    doc! { "_id": id_match(id) }
}

/// `_id` condition for `id`. A 24-digit hex id also matches the `ObjectId`
/// it was rendered from.
fn id_match(id: &str) -> Bson {
    match ObjectId::parse_str(id) {
        Ok(oid) => bson!({ "$in": [id, oid] }),
        Err(_) => Bson::String(id.to_string()),
    }
}

/// Maps a stored document back to an article.
///
/// Documents written by other tools may carry an `ObjectId`; it is exposed
/// as its hex string.
fn from_document(mut document: Document) -> Result<Article, StoreError> {
    let id = match document.remove("_id") {
        Some(Bson::String(id)) => id,
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(other) => other.into_relaxed_extjson().to_string(),
        None => {
            return Err(StoreError::Corrupt {
                id: String::new(),
                message: "document has no _id".to_string(),
            });
        }
    };

    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(Article { id, fields })
        }
        other => Err(StoreError::Corrupt {
            id,
            message: format!("expected a document, found {other}"),
        }),
    }
}
