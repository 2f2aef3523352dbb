//! In-memory remote store for tests and local development.

use std::collections::BTreeMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU32, Ordering},
};
use std::time::Duration;

use serde_json::Value;

use crate::error::RemoteError;

use super::{RawStoreSnapshot, RemoteStore};

#[derive(Default)]
struct SellerRecords {
    seller: Value,
    products: BTreeMap<String, Value>,
}

/// A mutable in-memory remote store.
///
/// Cloning shares the underlying data, so a test can hold one handle to
/// mutate records while the subscription under test polls another.
#[derive(Clone, Default)]
pub struct MemoryRemoteStore {
    sellers: Arc<Mutex<BTreeMap<String, SellerRecords>>>,
    /// Remaining fetches to fail with a simulated timeout.
    failures: Arc<AtomicU32>,
}

impl MemoryRemoteStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a seller profile.
    pub fn put_seller(&self, seller_id: &str, profile: Value) {
        let mut sellers = self.sellers.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        sellers.entry(seller_id.to_owned()).or_default().seller = profile;
    }

    /// Create or replace one product record.
    pub fn put_product(&self, seller_id: &str, product_id: &str, record: Value) {
        let mut sellers = self.sellers.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        sellers
            .entry(seller_id.to_owned())
            .or_default()
            .products
            .insert(product_id.to_owned(), record);
    }

    /// Delete one product record.
    pub fn remove_product(&self, seller_id: &str, product_id: &str) {
        let mut sellers = self.sellers.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(records) = sellers.get_mut(seller_id) {
            records.products.remove(product_id);
        }
    }

    /// Make the next `n` fetches fail with a simulated timeout.
    pub fn fail_next(&self, n: u32) {
        self.failures.store(n, Ordering::SeqCst);
    }
}

impl RemoteStore for MemoryRemoteStore {
    async fn fetch_snapshot(&self, seller_id: &str) -> Result<RawStoreSnapshot, RemoteError> {
        if self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(RemoteError::Timeout(Duration::from_secs(10)));
        }

        let sellers = self.sellers.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let records = sellers
            .get(seller_id)
            .ok_or_else(|| RemoteError::StoreNotFound(seller_id.to_owned()))?;
        Ok(RawStoreSnapshot {
            seller: records.seller.clone(),
            products: records
                .products
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_seller_is_store_not_found() {
        let store = MemoryRemoteStore::new();
        let err = store.fetch_snapshot("nobody").await.unwrap_err();
        assert!(matches!(err, RemoteError::StoreNotFound(_)));
    }

    #[tokio::test]
    async fn snapshot_reflects_mutations() {
        let store = MemoryRemoteStore::new();
        store.put_seller("s1", json!({"id": "s1", "storeName": "Adoma Crafts"}));
        store.put_product("s1", "p1", json!({"name": "Shea butter"}));

        let snapshot = store.fetch_snapshot("s1").await.unwrap();
        assert_eq!(snapshot.products.len(), 1);

        store.remove_product("s1", "p1");
        let snapshot = store.fetch_snapshot("s1").await.unwrap();
        assert!(snapshot.products.is_empty());
    }

    #[tokio::test]
    async fn injected_failures_are_consumed() {
        let store = MemoryRemoteStore::new();
        store.put_seller("s1", json!({"id": "s1"}));
        store.fail_next(2);

        assert!(store.fetch_snapshot("s1").await.is_err());
        assert!(store.fetch_snapshot("s1").await.is_err());
        assert!(store.fetch_snapshot("s1").await.is_ok());
    }
}
