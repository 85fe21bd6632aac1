//! Key-value adapters for carts.
//!
//! [`CartStore`] is the seam between the domain operations and the backing
//! store. [`connect_store`] picks the adapter from the connection URI.

mod memory;
mod redis;

use std::sync::Arc;
use std::time::Duration;

use alpha_core::storage::uri_scheme;
use alpha_core::{ConnectionError, StoreError};
use async_trait::async_trait;

pub use self::memory::MemoryCartStore;
pub use self::redis::RedisCartStore;

use crate::model::Cart;

/// Persistence contract for carts.
///
/// `get` of an unknown id returns `None`; `delete` of an unknown id succeeds.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Cart>, StoreError>;

    /// Replaces the stored cart wholesale, creating it if absent.
    async fn put(&self, cart: &Cart) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Opens the adapter matching the URI scheme and checks it is reachable.
///
/// `redis://`, `rediss://` and `redis+unix://` select Redis, `memory://` the
/// in-process store.
///
/// # Errors
///
/// Returns [`ConnectionError`] for an unknown scheme, an unparsable URI, or
/// a store that does not answer `PING`.
pub async fn connect_store(
    uri: &str,
    timeout: Duration,
) -> Result<Arc<dyn CartStore>, ConnectionError> {
    match uri_scheme(uri) {
        Some("redis" | "rediss" | "redis+unix") => {
            Ok(Arc::new(RedisCartStore::connect(uri, timeout).await?))
        }
        Some("memory") => Ok(Arc::new(MemoryCartStore::new(timeout))),
        _ => Err(ConnectionError::UnsupportedScheme {
            uri: uri.to_string(),
        }),
    }
}
