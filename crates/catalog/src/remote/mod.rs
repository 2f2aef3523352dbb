//! Remote store adapter.
//!
//! The remote store holds, per seller, a profile record and a products
//! collection keyed by opaque string identifiers. The adapter does not
//! diff: every fetch returns the full current snapshot, and the catalog
//! cache replaces its contents wholesale per delivery.

mod http;
mod memory;

pub use http::HttpRemoteStore;
pub use memory::MemoryRemoteStore;

use serde_json::Value;

use crate::error::RemoteError;

/// Full point-in-time state of one seller's remote data, raw and
/// non-canonical. Normalization happens in [`crate::sync`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawStoreSnapshot {
    /// Raw seller profile record.
    pub seller: Value,
    /// Raw product records, keyed by their collection identifiers, in
    /// stable key order.
    pub products: Vec<(String, Value)>,
}

/// Read access to the remote store.
///
/// The `Send` bound on the returned future lets the subscription loop run
/// the fetch from a spawned task.
pub trait RemoteStore: Send + Sync + 'static {
    /// Fetch the seller's full current snapshot.
    ///
    /// A missing seller is [`RemoteError::StoreNotFound`], which is
    /// terminal; everything else is treated as transient.
    fn fetch_snapshot(
        &self,
        seller_id: &str,
    ) -> impl Future<Output = Result<RawStoreSnapshot, RemoteError>> + Send;
}
