//! In-memory catalog cache.
//!
//! Holds the most recent normalized product list and seller profile for the
//! active seller. Replacement is atomic from the consumer's point of view:
//! readers take the lock for the duration of a clone, so a partial update
//! is never observable. Subscribers get a revision bump on every change via
//! a `watch` channel and recompute their derived view from `get_all`.

use std::sync::{Arc, RwLock};

use tokio::sync::watch;

use makola_core::{Product, Seller};

#[derive(Default)]
struct CatalogState {
    products: Vec<Product>,
    seller: Option<Seller>,
    revision: u64,
}

/// Shared, live-updated catalog snapshot for one seller.
#[derive(Clone)]
pub struct CatalogCache {
    state: Arc<RwLock<CatalogState>>,
    notify: watch::Sender<u64>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCache {
    #[must_use]
    pub fn new() -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            state: Arc::new(RwLock::new(CatalogState::default())),
            notify,
        }
    }

    /// Replace the product list wholesale (latest snapshot wins).
    pub fn replace_products(&self, products: Vec<Product>) {
        let revision = {
            let mut state = self.write();
            state.products = products;
            state.revision += 1;
            state.revision
        };
        // Receivers may all be gone; that is fine.
        let _ = self.notify.send(revision);
    }

    /// Replace the seller profile.
    pub fn set_seller(&self, seller: Seller) {
        let revision = {
            let mut state = self.write();
            state.seller = Some(seller);
            state.revision += 1;
            state.revision
        };
        let _ = self.notify.send(revision);
    }

    /// Every cached product, archived ones included. Empty remote data
    /// yields an empty list, never an absent one.
    #[must_use]
    pub fn get_all(&self) -> Vec<Product> {
        self.read().products.clone()
    }

    /// Products visible to buyers (excludes archived).
    #[must_use]
    pub fn get_visible(&self) -> Vec<Product> {
        self.read()
            .products
            .iter()
            .filter(|p| p.status.is_visible())
            .cloned()
            .collect()
    }

    /// The cached seller profile, if one has been delivered.
    #[must_use]
    pub fn seller(&self) -> Option<Seller> {
        self.read().seller.clone()
    }

    /// Current revision counter; bumps on every replace.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.read().revision
    }

    /// Subscribe to change notifications. The received value is the
    /// revision counter; consumers re-read the cache on every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use makola_core::normalize::normalize_product;
    use serde_json::json;

    fn product(id: &str, status: &str) -> Product {
        normalize_product(&json!({"id": id, "name": id, "price": 5, "status": status}))
    }

    #[test]
    fn empty_cache_returns_empty_list() {
        let cache = CatalogCache::new();
        assert!(cache.get_all().is_empty());
        assert!(cache.seller().is_none());
    }

    #[test]
    fn visible_excludes_archived() {
        let cache = CatalogCache::new();
        cache.replace_products(vec![
            product("a", "active"),
            product("b", "archived"),
            product("c", "out-of-stock"),
        ]);
        assert_eq!(cache.get_all().len(), 3);
        let visible = cache.get_visible();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|p| p.id != "b"));
    }

    #[test]
    fn replace_bumps_revision_and_notifies() {
        let cache = CatalogCache::new();
        let rx = cache.subscribe();
        assert_eq!(*rx.borrow(), 0);

        cache.replace_products(vec![product("a", "active")]);
        assert_eq!(cache.revision(), 1);
        assert_eq!(*rx.borrow(), 1);

        cache.replace_products(Vec::new());
        assert_eq!(*rx.borrow(), 2);
        assert!(cache.get_all().is_empty());
    }
}
