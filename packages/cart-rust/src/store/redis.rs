//! Redis [`CartStore`].
//!
//! Each cart is the JSON encoding of [`Cart`] under `cart:{id}`. One
//! multiplexed [`ConnectionManager`] is shared by all requests; it
//! reconnects on its own after a dropped connection.

use std::time::Duration;

use alpha_core::storage::{observe, StoreCall};
use alpha_core::{ConnectionError, StoreError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::CartStore;
use crate::model::Cart;

const STORE_LABEL: &str = "redis";
const KEY_PREFIX: &str = "cart:";

pub struct RedisCartStore {
    connection: ConnectionManager,
    timeout: Duration,
}

impl RedisCartStore {
    /// Opens the client, establishes the managed connection and sends `PING`.
    ///
    /// # Errors
    ///
    /// [`ConnectionError::InvalidUri`] when the URI cannot be parsed,
    /// [`ConnectionError::Unreachable`] when no connection or `PING` reply
    /// arrives within `timeout`.
    pub async fn connect(uri: &str, timeout: Duration) -> Result<Self, ConnectionError> {
        let client = redis::Client::open(uri).map_err(|err| ConnectionError::InvalidUri {
            uri: uri.to_string(),
            message: err.to_string(),
        })?;

        let unreachable = |message: String| ConnectionError::Unreachable {
            uri: uri.to_string(),
            message,
        };

        let mut connection = tokio::time::timeout(timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| unreachable(format!("no connection within {}ms", timeout.as_millis())))?
            .map_err(|err| unreachable(err.to_string()))?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut connection)
            .await
            .map_err(|err| unreachable(err.to_string()))?;
        tracing::debug!(reply = %pong, "redis ping ok");

        Ok(Self {
            connection,
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

fn cart_key(id: &str) -> String {
    format!("{KEY_PREFIX}{id}")
}

fn decode_cart(id: &str, raw: &str) -> Result<Cart, StoreError> {
    serde_json::from_str(raw).map_err(|err| StoreError::Corrupt {
        id: id.to_string(),
        message: err.to_string(),
    })
}

#[async_trait]
impl CartStore for RedisCartStore {
    async fn get(&self, id: &str) -> Result<Option<Cart>, StoreError> {
        observe(self.call("get"), async {
            let mut connection = self.connection.clone();
            let raw: Option<String> = connection
                .get(cart_key(id))
                .await
                .map_err(|err| StoreError::backend("get", err))?;
            raw.map(|raw| decode_cart(id, &raw)).transpose()
        })
        .await
    }

    async fn put(&self, cart: &Cart) -> Result<(), StoreError> {
        observe(self.call("put"), async {
            let payload =
                serde_json::to_string(cart).map_err(|err| StoreError::backend("put", err))?;
            let mut connection = self.connection.clone();
            let () = connection
                .set(cart_key(&cart.id), payload)
                .await
                .map_err(|err| StoreError::backend("put", err))?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        observe(self.call("delete"), async {
            let mut connection = self.connection.clone();
            let () = connection
                .del(cart_key(id))
                .await
                .map_err(|err| StoreError::backend("delete", err))?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_prefixed() {
        assert_eq!(cart_key("c-1"), "cart:c-1");
    }

    #[test]
    fn decodes_stored_json() {
        let cart = decode_cart("c-1", r#"{"id":"c-1","items":["a","b"]}"#).unwrap();
        assert_eq!(cart.items, vec!["a", "b"]);
    }

    #[test]
    fn garbage_value_is_corrupt() {
        let err = decode_cart("c-1", "not json").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref id, .. } if id == "c-1"));
    }

    #[tokio::test]
    async fn unparsable_uri_is_invalid() {
        let err = RedisCartStore::connect("redis://localhost:notaport", Duration::from_secs(1))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ConnectionError::InvalidUri { .. }));
    }
}
