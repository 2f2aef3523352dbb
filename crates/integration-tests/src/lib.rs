//! Integration tests for the Makola catalog engine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p makola-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_sync` - remote adapter, subscription, and cache end to end
//! - `storefront_flow` - raw records through normalization, views, and
//!   favorites the way a storefront session exercises them
//! - `whatsapp_messages` - composed messages and `wa.me` deep links
//!
//! The tests in `catalog_sync` spin up a mock HTTP server per test; nothing
//! here needs external services.
