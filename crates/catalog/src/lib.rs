//! Makola Catalog - live catalog synchronization and presentation engine.
//!
//! This crate keeps a per-seller product catalog consistent with a remote
//! store and derives everything a storefront UI renders from it:
//!
//! - [`remote`] - remote store adapter (HTTP implementation + trait for tests)
//! - [`sync`] - snapshot fetch with retry/timeout, and the live subscription
//! - [`cache`] - atomic in-memory catalog snapshot with change notification
//! - [`view`] - pure filter/sort/search over the cached catalog
//! - [`favorites`] - persisted per-seller favorites and product drafts
//! - [`track`] - fire-and-forget interaction event emission
//! - [`config`] - environment-based engine configuration
//!
//! # Control flow
//!
//! The UI collaborator subscribes via [`sync::subscribe`]; each delivered
//! snapshot is normalized through `makola-core` and swapped wholesale into
//! the [`cache::CatalogCache`] (latest snapshot wins, no diffing). The UI
//! recomputes its derived view with [`view::derive_view`] on every cache or
//! query-state change; user actions flow back through [`favorites`] and
//! [`track`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod error;
pub mod favorites;
pub mod remote;
pub mod sync;
pub mod track;
pub mod view;

pub use error::{RemoteError, StorageError};
