//! Persisted favorites and product drafts.
//!
//! Both ride on an injected [`StoragePort`] so production can bind whatever
//! durable key-value facility is available while tests substitute
//! [`MemoryStorage`]. Storage faults are logged and swallowed; the
//! in-memory state always reflects the user's action.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tracing::warn;

use makola_core::{InteractionEvent, InteractionKind};

use crate::error::StorageError;
use crate::track::InteractionTracker;

/// Key-value persistence port.
pub trait StoragePort: Send + Sync {
    /// Read the value under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails (quota, disabled storage);
    /// callers treat that as best-effort.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`, if any.
    fn remove(&self, key: &str);
}

/// In-memory storage port for tests and ephemeral sessions.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
    }
}

/// Per-(seller, viewer) favorites set, persisted as an ordered list for
/// stable serialization.
pub struct FavoritesStore<P: StoragePort> {
    storage: P,
    tracker: InteractionTracker,
    seller_id: String,
    /// Insertion-ordered; membership checks scan, which is fine at
    /// favorites scale.
    ids: Vec<String>,
}

impl<P: StoragePort> FavoritesStore<P> {
    /// Load the persisted set for `seller_id`.
    ///
    /// Corrupted persisted state is discarded and the key cleared rather
    /// than propagated.
    pub fn load(storage: P, tracker: InteractionTracker, seller_id: impl Into<String>) -> Self {
        let seller_id = seller_id.into();
        let key = favorites_key(&seller_id);
        let ids = match storage.get(&key) {
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => ids,
                Err(_) => {
                    warn!(%key, "Discarding corrupt favorites state");
                    storage.remove(&key);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Self {
            storage,
            tracker,
            seller_id,
            ids,
        }
    }

    /// Flip membership for `product_id`; returns whether it is now a
    /// favorite. Persists immediately (best effort) and emits one event.
    pub fn toggle(&mut self, product_id: &str) -> bool {
        let added = if let Some(pos) = self.ids.iter().position(|id| id == product_id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(product_id.to_owned());
            true
        };

        self.persist();

        let kind = if added {
            InteractionKind::FavoriteAdd
        } else {
            InteractionKind::FavoriteRemove
        };
        self.tracker
            .track(InteractionEvent::new(kind, &self.seller_id).with_product(product_id));

        added
    }

    #[must_use]
    pub fn contains(&self, product_id: &str) -> bool {
        self.ids.iter().any(|id| id == product_id)
    }

    /// Favorite identifiers in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Membership set for [`crate::view::ViewQuery`].
    #[must_use]
    pub fn as_set(&self) -> HashSet<String> {
        self.ids.iter().cloned().collect()
    }

    fn persist(&self) {
        let key = favorites_key(&self.seller_id);
        let json = match serde_json::to_string(&self.ids) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize favorites");
                return;
            }
        };
        if let Err(e) = self.storage.set(&key, &json) {
            // The in-memory toggle already succeeded; the UI never blocks
            // on a storage fault.
            warn!(error = %e, %key, "Failed to persist favorites");
        }
    }
}

fn favorites_key(seller_id: &str) -> String {
    format!("favorites_{seller_id}")
}

/// Best-effort autosave of an in-progress product form.
pub struct DraftStore<P: StoragePort> {
    storage: P,
    user_id: String,
}

impl<P: StoragePort> DraftStore<P> {
    pub fn new(storage: P, user_id: impl Into<String>) -> Self {
        Self {
            storage,
            user_id: user_id.into(),
        }
    }

    /// Overwrite the draft snapshot.
    pub fn save(&self, draft: &serde_json::Value) {
        let key = self.key();
        let json = draft.to_string();
        if let Err(e) = self.storage.set(&key, &json) {
            warn!(error = %e, %key, "Failed to autosave draft");
        }
    }

    /// The saved snapshot, if present and parseable.
    #[must_use]
    pub fn load(&self) -> Option<serde_json::Value> {
        let raw = self.storage.get(&self.key())?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(_) => {
                self.storage.remove(&self.key());
                None
            }
        }
    }

    /// Drop the draft (after successful submit).
    pub fn clear(&self) {
        self.storage.remove(&self.key());
    }

    fn key(&self) -> String {
        format!("productDraft_{}", self.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::MemorySink;
    use serde_json::json;

    fn store_with_sink() -> (FavoritesStore<MemoryStorage>, MemorySink, MemoryStorage) {
        let storage = MemoryStorage::new();
        let sink = MemorySink::new();
        let tracker = InteractionTracker::new(Arc::new(sink.clone()));
        let store = FavoritesStore::load(storage.clone(), tracker, "s1");
        (store, sink, storage)
    }

    #[test]
    fn toggle_adds_then_removes() {
        let (mut store, sink, _) = store_with_sink();

        assert!(store.toggle("p1"));
        assert!(store.contains("p1"));
        assert!(!store.toggle("p1"));
        assert!(!store.contains("p1"));

        let kinds: Vec<_> = sink.events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [InteractionKind::FavoriteAdd, InteractionKind::FavoriteRemove]
        );
    }

    #[test]
    fn double_toggle_persists_original_state() {
        let (mut store, _, storage) = store_with_sink();

        store.toggle("p1");
        let before = storage.get("favorites_s1");
        store.toggle("p2");
        store.toggle("p2");
        assert_eq!(storage.get("favorites_s1"), before);
    }

    #[test]
    fn state_survives_reload() {
        let storage = MemoryStorage::new();
        {
            let mut store = FavoritesStore::load(
                storage.clone(),
                InteractionTracker::disabled(),
                "s1",
            );
            store.toggle("p1");
            store.toggle("p2");
        }
        let store = FavoritesStore::load(storage, InteractionTracker::disabled(), "s1");
        assert_eq!(store.ids(), ["p1", "p2"]);
    }

    #[test]
    fn favorites_are_namespaced_per_seller() {
        let storage = MemoryStorage::new();
        let mut a = FavoritesStore::load(storage.clone(), InteractionTracker::disabled(), "s1");
        a.toggle("p1");
        let b = FavoritesStore::load(storage, InteractionTracker::disabled(), "s2");
        assert!(!b.contains("p1"));
    }

    #[test]
    fn corrupt_state_resets_and_clears_key() {
        let storage = MemoryStorage::new();
        storage.set("favorites_s1", "not json [").unwrap();

        let store = FavoritesStore::load(storage.clone(), InteractionTracker::disabled(), "s1");
        assert!(store.ids().is_empty());
        assert!(storage.get("favorites_s1").is_none());
    }

    struct BrokenStorage;

    impl StoragePort for BrokenStorage {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }
        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteFailed {
                key: key.to_owned(),
                reason: "quota exceeded".to_owned(),
            })
        }
        fn remove(&self, _key: &str) {}
    }

    #[test]
    fn storage_fault_does_not_block_toggle() {
        let mut store =
            FavoritesStore::load(BrokenStorage, InteractionTracker::disabled(), "s1");
        assert!(store.toggle("p1"));
        assert!(store.contains("p1"));
    }

    #[test]
    fn draft_round_trip_and_clear() {
        let storage = MemoryStorage::new();
        let drafts = DraftStore::new(storage.clone(), "u1");

        assert!(drafts.load().is_none());
        drafts.save(&json!({"name": "Kente stole", "price": "80"}));
        assert_eq!(drafts.load().unwrap()["name"], "Kente stole");

        drafts.save(&json!({"name": "Updated"}));
        assert_eq!(drafts.load().unwrap()["name"], "Updated");

        drafts.clear();
        assert!(drafts.load().is_none());
    }

    #[test]
    fn corrupt_draft_is_discarded() {
        let storage = MemoryStorage::new();
        storage.set("productDraft_u1", "{broken").unwrap();
        let drafts = DraftStore::new(storage.clone(), "u1");
        assert!(drafts.load().is_none());
        assert!(storage.get("productDraft_u1").is_none());
    }
}
