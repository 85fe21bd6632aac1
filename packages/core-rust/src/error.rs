//! Error taxonomy for the request pipeline.
//!
//! Errors are values all the way up to the handler. [`ApiError`] is the single
//! translation point from a domain failure to an HTTP status and payload.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};

/// A backing store could not be reached or configured at startup.
///
/// Always fatal: a service must not serve traffic against an unreachable store.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("invalid store uri {uri}: {message}")]
    InvalidUri { uri: String, message: String },
    #[error("unsupported store uri scheme: {uri}")]
    UnsupportedScheme { uri: String },
    #[error("store at {uri} is unreachable: {message}")]
    Unreachable { uri: String, message: String },
}

/// A request body did not match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DecodeError {
    pub message: String,
}

impl DecodeError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// A backing-store operation failed after the connection was established.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },
    #[error("stored record {id} is corrupt: {message}")]
    Corrupt { id: String, message: String },
}

impl StoreError {
    /// Wraps a client library error raised while running `operation`.
    pub fn backend(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Backend {
            operation,
            message: err.to_string(),
        }
    }
}

/// Handler-level error, rendered as `{ "error": ... }` plus an optional
/// identifier field (e.g. `articleId`).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("{operation} failed: {source}")]
    Store {
        operation: &'static str,
        subject: Option<(&'static str, String)>,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// A store failure with no identifier in the payload.
    #[must_use]
    pub fn store(operation: &'static str, source: StoreError) -> Self {
        Self::Store {
            operation,
            subject: None,
            source,
        }
    }

    /// A store failure that echoes `field: id` back to the caller.
    #[must_use]
    pub fn store_for(
        operation: &'static str,
        field: &'static str,
        id: impl Into<String>,
        source: StoreError,
    ) -> Self {
        Self::Store {
            operation,
            subject: Some((field, id.into())),
            source,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            Self::Decode(err) => json!({ "error": err.message }),
            Self::Store {
                subject, source, ..
            } => {
                let mut body = Map::new();
                body.insert("error".to_string(), Value::String(source.to_string()));
                if let Some((field, id)) = subject {
                    body.insert((*field).to_string(), Value::String(id.clone()));
                }
                Value::Object(body)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Decode(err) => {
                tracing::debug!(error = %err, "rejected request body");
            }
            Self::Store {
                operation,
                subject,
                source,
            } => {
                let id = subject.as_ref().map(|(_, id)| id.as_str());
                tracing::warn!(operation, id, error = %source, "{operation} error");
            }
        }
        (self.status(), Json(self.body())).into_response()
    }
}
