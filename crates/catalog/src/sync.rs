//! Snapshot fetching and the live catalog subscription.
//!
//! [`fetch_once`] is the discrete point-in-time fetch used by manual
//! refresh and retry flows: each attempt races a fixed deadline, transient
//! failures retry with linear backoff, and a missing store surfaces
//! immediately as terminal.
//!
//! [`subscribe`] keeps a [`CatalogCache`] consistent with the remote store:
//! the full raw snapshot is re-fetched on an interval and applied wholesale
//! whenever it differs from the previous delivery (latest snapshot wins).
//! While a fetch is failing, the previous cache contents stay visible -
//! stale, not blank.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, instrument, warn};

use makola_core::normalize::{normalize_product_keyed, normalize_seller};

use crate::cache::CatalogCache;
use crate::config::CatalogConfig;
use crate::error::RemoteError;
use crate::remote::{RawStoreSnapshot, RemoteStore};

/// Retry policy for discrete fetches.
///
/// The defaults are tuning values, not contracts; see
/// [`CatalogConfig`] for the environment overrides.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Deadline for a single attempt.
    pub timeout: Duration,
    /// Additional attempts after the first failure.
    pub retries: u32,
    /// Linear backoff step: attempt `n` waits `n * backoff_step`.
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retries: 3,
            backoff_step: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub const fn from_config(config: &CatalogConfig) -> Self {
        Self {
            timeout: config.fetch_timeout,
            retries: config.fetch_retries,
            backoff_step: Duration::from_secs(1),
        }
    }
}

/// Fetch one full snapshot, racing the deadline and retrying transient
/// failures with linear backoff (1s, 2s, 3s by default).
///
/// # Errors
///
/// [`RemoteError::StoreNotFound`] is returned immediately without retrying;
/// transient failures exhaust the policy and surface as
/// [`RemoteError::RetriesExhausted`].
#[instrument(skip(store, policy))]
pub async fn fetch_once<S: RemoteStore>(
    store: &S,
    seller_id: &str,
    policy: RetryPolicy,
) -> Result<RawStoreSnapshot, RemoteError> {
    let mut last: Option<RemoteError> = None;

    for attempt in 0..=policy.retries {
        if attempt > 0 {
            let delay = policy.backoff_step * attempt;
            debug!(attempt, ?delay, "Retrying snapshot fetch");
            time::sleep(delay).await;
        }

        match time::timeout(policy.timeout, store.fetch_snapshot(seller_id)).await {
            Ok(Ok(snapshot)) => return Ok(snapshot),
            Ok(Err(e)) if !e.is_retryable() => return Err(e),
            Ok(Err(e)) => {
                warn!(attempt, error = %e, "Snapshot fetch failed");
                last = Some(e);
            }
            Err(_) => {
                warn!(attempt, "Snapshot fetch exceeded deadline");
                last = Some(RemoteError::Timeout(policy.timeout));
            }
        }
    }

    let last = last.unwrap_or(RemoteError::Timeout(policy.timeout));
    Err(RemoteError::RetriesExhausted {
        attempts: policy.retries + 1,
        last: Box::new(last),
    })
}

/// Health of a live subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// No snapshot delivered yet.
    Connecting,
    /// The cache reflects the latest delivered snapshot.
    Live,
    /// The seller record is absent; terminal, the subscription has stopped.
    StoreNotFound,
    /// Retries exhausted on the most recent poll; the previous cache
    /// contents remain visible and polling continues.
    Degraded(String),
}

/// Options for a live subscription.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub policy: RetryPolicy,
    /// How often the remote snapshot is re-fetched.
    pub poll_interval: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            policy: RetryPolicy::default(),
            poll_interval: Duration::from_secs(5),
        }
    }
}

impl SyncOptions {
    #[must_use]
    pub const fn from_config(config: &CatalogConfig) -> Self {
        Self {
            policy: RetryPolicy::from_config(config),
            poll_interval: config.poll_interval,
        }
    }
}

/// Handle to a live subscription. Dropping it unsubscribes.
pub struct SubscriptionHandle {
    alive: Arc<AtomicBool>,
    status: watch::Receiver<SyncStatus>,
    task: tokio::task::JoinHandle<()>,
}

impl SubscriptionHandle {
    /// Stop the subscription. Safe to call multiple times; after the first
    /// call no further delivery mutates the cache.
    pub fn unsubscribe(&self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            self.task.abort();
        }
    }

    /// Watch the subscription's health.
    #[must_use]
    pub fn status(&self) -> watch::Receiver<SyncStatus> {
        self.status.clone()
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Subscribe `cache` to the seller's remote data.
///
/// The first successful fetch delivers the full current snapshot; every
/// subsequent poll re-delivers the whole collection and the cache replaces
/// its contents wholesale when anything changed. No diffing.
pub fn subscribe<S: RemoteStore>(
    store: Arc<S>,
    cache: CatalogCache,
    seller_id: impl Into<String>,
    options: SyncOptions,
) -> SubscriptionHandle {
    let seller_id = seller_id.into();
    let alive = Arc::new(AtomicBool::new(true));
    let (status_tx, status_rx) = watch::channel(SyncStatus::Connecting);

    let task = tokio::spawn(run_subscription(
        store,
        cache,
        seller_id,
        options,
        Arc::clone(&alive),
        status_tx,
    ));

    SubscriptionHandle {
        alive,
        status: status_rx,
        task,
    }
}

#[instrument(skip_all, fields(seller_id = %seller_id))]
async fn run_subscription<S: RemoteStore>(
    store: Arc<S>,
    cache: CatalogCache,
    seller_id: String,
    options: SyncOptions,
    alive: Arc<AtomicBool>,
    status: watch::Sender<SyncStatus>,
) {
    let mut last_raw: Option<RawStoreSnapshot> = None;

    loop {
        if !alive.load(Ordering::SeqCst) {
            return;
        }

        match fetch_once(store.as_ref(), &seller_id, options.policy).await {
            Ok(snapshot) => {
                // Liveness guard: an in-flight delivery must not mutate the
                // cache after unsubscribe.
                if !alive.load(Ordering::SeqCst) {
                    return;
                }
                if last_raw.as_ref() != Some(&snapshot) {
                    info!(
                        products = snapshot.products.len(),
                        "Applying catalog snapshot"
                    );
                    apply_snapshot(&cache, &snapshot);
                    last_raw = Some(snapshot);
                }
                let _ = status.send(SyncStatus::Live);
            }
            Err(e @ RemoteError::StoreNotFound(_)) => {
                warn!(error = %e, "Store not found, stopping subscription");
                let _ = status.send(SyncStatus::StoreNotFound);
                return;
            }
            Err(e) => {
                // Stale-while-revalidate: keep showing the previous
                // snapshot and keep polling.
                warn!(error = %e, "Snapshot poll failed, keeping previous contents");
                let _ = status.send(SyncStatus::Degraded(e.to_string()));
            }
        }

        time::sleep(options.poll_interval).await;
    }
}

/// Normalize and swap a raw snapshot into the cache.
fn apply_snapshot(cache: &CatalogCache, snapshot: &RawStoreSnapshot) {
    cache.set_seller(normalize_seller(&snapshot.seller));
    let products = snapshot
        .products
        .iter()
        .map(|(key, raw)| normalize_product_keyed(key, raw))
        .collect();
    cache.replace_products(products);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryRemoteStore;
    use serde_json::json;

    fn seeded_store() -> MemoryRemoteStore {
        let store = MemoryRemoteStore::new();
        store.put_seller("s1", json!({"id": "s1", "storeName": "Adoma Crafts"}));
        store.put_product("s1", "p1", json!({"name": "Shea butter", "price": 25}));
        store
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_millis(100),
            retries: 3,
            backoff_step: Duration::from_millis(10),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_once_retries_transient_failures() {
        let store = seeded_store();
        store.fail_next(2);

        let snapshot = fetch_once(&store, "s1", fast_policy()).await.unwrap();
        assert_eq!(snapshot.products.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_once_exhausts_retries() {
        let store = seeded_store();
        store.fail_next(10);

        let err = fetch_once(&store, "s1", fast_policy()).await.unwrap_err();
        match err {
            RemoteError::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 4),
            other => panic!("expected RetriesExhausted, got {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_once_not_found_is_immediate() {
        let store = MemoryRemoteStore::new();
        let err = fetch_once(&store, "ghost", fast_policy()).await.unwrap_err();
        assert!(matches!(err, RemoteError::StoreNotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn subscription_delivers_initial_snapshot_and_updates() {
        let store = Arc::new(seeded_store());
        let cache = CatalogCache::new();
        let mut changes = cache.subscribe();

        let options = SyncOptions {
            policy: fast_policy(),
            poll_interval: Duration::from_millis(50),
        };
        let handle = subscribe(Arc::clone(&store), cache.clone(), "s1", options);

        // Initial delivery: seller + one product.
        changes.changed().await.unwrap();
        while cache.get_all().is_empty() {
            changes.changed().await.unwrap();
        }
        assert_eq!(cache.get_all().len(), 1);
        assert_eq!(cache.seller().unwrap().store_name, "Adoma Crafts");

        // Remote mutation shows up on a later poll.
        store.put_product("s1", "p2", json!({"name": "Black soap", "price": 10}));
        while cache.get_all().len() < 2 {
            changes.changed().await.unwrap();
        }

        handle.unsubscribe();
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_snapshots_are_not_reapplied() {
        let store = Arc::new(seeded_store());
        let cache = CatalogCache::new();
        let mut changes = cache.subscribe();

        let options = SyncOptions {
            policy: fast_policy(),
            poll_interval: Duration::from_millis(50),
        };
        let _handle = subscribe(Arc::clone(&store), cache.clone(), "s1", options);

        while cache.get_all().is_empty() {
            changes.changed().await.unwrap();
        }
        let revision = cache.revision();

        // Several idle polls later the revision is untouched.
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(cache.revision(), revision);
    }

    #[tokio::test(start_paused = true)]
    async fn unsubscribe_stops_delivery() {
        let store = Arc::new(seeded_store());
        let cache = CatalogCache::new();
        let mut changes = cache.subscribe();

        let options = SyncOptions {
            policy: fast_policy(),
            poll_interval: Duration::from_millis(50),
        };
        let handle = subscribe(Arc::clone(&store), cache.clone(), "s1", options);

        while cache.get_all().is_empty() {
            changes.changed().await.unwrap();
        }

        handle.unsubscribe();
        // Idempotent.
        handle.unsubscribe();

        let revision = cache.revision();
        store.put_product("s1", "p9", json!({"name": "New arrival"}));
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(cache.revision(), revision);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_store_reports_terminal_status() {
        let store = Arc::new(MemoryRemoteStore::new());
        let cache = CatalogCache::new();

        let options = SyncOptions {
            policy: fast_policy(),
            poll_interval: Duration::from_millis(50),
        };
        let handle = subscribe(store, cache, "ghost", options);
        let mut status = handle.status();

        while *status.borrow() != SyncStatus::StoreNotFound {
            status.changed().await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_keeps_previous_contents() {
        let store = Arc::new(seeded_store());
        let cache = CatalogCache::new();
        let mut changes = cache.subscribe();

        let options = SyncOptions {
            policy: RetryPolicy {
                retries: 0,
                ..fast_policy()
            },
            poll_interval: Duration::from_millis(50),
        };
        let handle = subscribe(Arc::clone(&store), cache.clone(), "s1", options);

        while cache.get_all().is_empty() {
            changes.changed().await.unwrap();
        }

        store.fail_next(1);
        let mut status = handle.status();
        while !matches!(&*status.borrow(), SyncStatus::Degraded(_)) {
            status.changed().await.unwrap();
        }
        // Stale, not blank.
        assert_eq!(cache.get_all().len(), 1);
    }
}
