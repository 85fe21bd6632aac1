//! Lenient JSON body extractor.
//!
//! Unlike `axum::Json`, [`JsonBody`] does not require a `Content-Type` header
//! and maps every failure (unreadable body, bad syntax, wrong shape) to a
//! single [`DecodeError`], which renders as 400.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, DecodeError};

/// Request body decoded from JSON into `T`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| DecodeError::new(rejection.body_text()))?;
        decode(&bytes).map(JsonBody).map_err(ApiError::from)
    }
}

/// Decodes a JSON document, treating an empty body as a decode error.
///
/// # Errors
///
/// Returns [`DecodeError`] when `bytes` is empty or not a valid `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::new("request body is empty"));
    }
    Ok(serde_json::from_slice(bytes)?)
}
