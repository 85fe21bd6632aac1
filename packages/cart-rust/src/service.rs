//! Cart domain operations.

use std::sync::Arc;

use alpha_core::StoreError;

use crate::model::Cart;
use crate::store::CartStore;

/// Stateless translator between handlers and the injected [`CartStore`].
///
/// Concurrent updates of the same cart are last-writer-wins.
pub struct CartService {
    store: Arc<dyn CartStore>,
}

impl CartService {
    #[must_use]
    pub fn new(store: Arc<dyn CartStore>) -> Self {
        Self { store }
    }

    /// The stored cart, or an empty one if nothing is stored under `id`.
    ///
    /// # Errors
    ///
    /// Propagates the store failure.
    pub async fn get_cart(&self, id: &str) -> Result<Cart, StoreError> {
        Ok(self
            .store
            .get(id)
            .await?
            .unwrap_or_else(|| Cart::empty(id)))
    }

    /// Replaces the cart's items wholesale.
    ///
    /// # Errors
    ///
    /// Propagates the store failure.
    pub async fn update_cart(&self, id: &str, items: Vec<String>) -> Result<(), StoreError> {
        self.store
            .put(&Cart {
                id: id.to_string(),
                items,
            })
            .await
    }

    /// Forgets the cart; it reads as empty afterwards.
    ///
    /// # Errors
    ///
    /// Propagates the store failure.
    pub async fn delete_cart(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(id).await
    }
}
