//! Cart records.

use serde::{Deserialize, Serialize};

/// A shopping cart: one per owning identity, items are opaque strings.
///
/// A cart with no stored record is indistinguishable from an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,
    #[serde(default)]
    pub items: Vec<String>,
}

impl Cart {
    #[must_use]
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            items: Vec::new(),
        }
    }
}

/// Request body of `PUT /cart/{cart_id}/`.
///
/// A missing `items` field means an empty cart; `null` is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCartRequest {
    #[serde(default)]
    pub items: Vec<String>,
}
