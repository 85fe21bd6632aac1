//! In-process [`CartStore`] backed by [`DashMap`].

use std::time::Duration;

use alpha_core::storage::{observe, StoreCall};
use alpha_core::StoreError;
use async_trait::async_trait;
use dashmap::DashMap;

use super::CartStore;
use crate::model::Cart;

const STORE_LABEL: &str = "memory";

pub struct MemoryCartStore {
    carts: DashMap<String, Cart>,
    timeout: Duration,
}

impl MemoryCartStore {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            carts: DashMap::new(),
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

impl Default for MemoryCartStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn get(&self, id: &str) -> Result<Option<Cart>, StoreError> {
        observe(self.call("get"), async {
            Ok(self.carts.get(id).map(|entry| entry.value().clone()))
        })
        .await
    }

    async fn put(&self, cart: &Cart) -> Result<(), StoreError> {
        observe(self.call("put"), async {
            self.carts.insert(cart.id.clone(), cart.clone());
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        observe(self.call("delete"), async {
            self.carts.remove(id);
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_delete() {
        let store = MemoryCartStore::default();
        let cart = Cart {
            id: "c-1".to_string(),
            items: vec!["apple".to_string()],
        };

        store.put(&cart).await.unwrap();
        assert_eq!(store.get("c-1").await.unwrap(), Some(cart));

        store.delete("c-1").await.unwrap();
        assert_eq!(store.get("c-1").await.unwrap(), None);
    }
}
