//! Outbound interaction events.
//!
//! Events are write-once signals emitted toward an external sink; nothing in
//! this engine ever reads them back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of interaction occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    View,
    Contact,
    FavoriteAdd,
    FavoriteRemove,
    StoreView,
}

/// A single fire-and-forget interaction record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub seller_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl InteractionEvent {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(kind: InteractionKind, seller_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            seller_id: seller_id.into(),
            product_id: None,
            metadata: BTreeMap::new(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Attach the product this interaction concerns.
    #[must_use]
    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Attach a metadata key/value pair.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
