//! Makola Core - Canonical catalog domain library.
//!
//! This crate provides the pure domain layer shared by all Makola components:
//! - [`types`] - Canonical `Product`, `Seller`, and `InteractionEvent` shapes
//! - [`normalize`] - Boundary conversion from raw remote records into canonical shapes
//! - [`phone`] - International phone number validation and normalization
//! - [`messages`] - Deterministic outbound WhatsApp message composition
//! - [`links`] - Deep-link and public catalog URL building/parsing
//! - [`validation`] - Field-level validation for the creation path
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async. Everything here is deterministic and trivially unit
//! testable; the live engine in `makola-catalog` builds on top of it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod links;
pub mod messages;
pub mod normalize;
pub mod phone;
pub mod types;
pub mod validation;

pub use types::*;
