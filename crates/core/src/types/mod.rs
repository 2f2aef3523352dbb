//! Canonical types for Makola.
//!
//! Every record entering the system is converted into these shapes exactly
//! once, at the boundary (see [`crate::normalize`]). Code past the boundary
//! never branches on legacy wire variants.

pub mod event;
pub mod product;
pub mod seller;

pub use event::{InteractionEvent, InteractionKind};
pub use product::{
    Analytics, Description, PLACEHOLDER_IMAGE, Product, ProductImages, ProductStatus,
};
pub use seller::Seller;
