//! HTTP handlers for the cart routes.

use std::sync::Arc;

use alpha_core::{ApiError, JsonBody};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::model::{Cart, UpdateCartRequest};
use crate::service::CartService;

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Cart,
}

/// `GET /cart/{cart_id}/`
pub async fn get_cart(
    State(service): State<Arc<CartService>>,
    Path(cart_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = service
        .get_cart(&cart_id)
        .await
        .map_err(|err| ApiError::store("GetCart", err))?;
    Ok(Json(CartResponse { cart }))
}

/// `PUT /cart/{cart_id}/`
pub async fn update_cart(
    State(service): State<Arc<CartService>>,
    Path(cart_id): Path<String>,
    JsonBody(request): JsonBody<UpdateCartRequest>,
) -> Result<StatusCode, ApiError> {
    service
        .update_cart(&cart_id, request.items)
        .await
        .map_err(|err| ApiError::store("UpdateCart", err))?;
    Ok(StatusCode::ACCEPTED)
}

/// `DELETE /cart/{cart_id}/`
pub async fn delete_cart(
    State(service): State<Arc<CartService>>,
    Path(cart_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service
        .delete_cart(&cart_id)
        .await
        .map_err(|err| ApiError::store_for("DeleteCart", "cartId", cart_id, err))?;
    Ok(StatusCode::ACCEPTED)
}
