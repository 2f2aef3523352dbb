//! Field-level validation for the creation path.
//!
//! Malformed input is rejected here, before anything is written; malformed
//! *existing* data is instead degraded by [`crate::normalize`]. The split
//! keeps the read path total while the write path stays strict.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::phone;
use crate::types::{Product, Seller};

/// Field name -> human-readable message, ordered for stable display.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Validate a product before it is written.
///
/// # Errors
///
/// Returns every failing field at once so the caller can surface all of
/// them in a single pass.
pub fn validate_product(product: &Product) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if product.name.trim().is_empty() {
        errors.insert("name", "Product name is required".to_owned());
    }
    if product.price <= Decimal::ZERO {
        errors.insert("price", "Price must be greater than zero".to_owned());
    }
    if product.quantity < 0 {
        errors.insert("quantity", "Quantity cannot be negative".to_owned());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate a seller profile before it is written.
///
/// # Errors
///
/// Returns every failing field at once.
pub fn validate_seller(seller: &Seller) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if seller.store_name.trim().is_empty() {
        errors.insert("storeName", "Store name is required".to_owned());
    }
    let result = phone::validate(&seller.whatsapp_number, "");
    if !result.is_valid {
        errors.insert(
            "whatsappNumber",
            result
                .error
                .unwrap_or_else(|| "Invalid WhatsApp number".to_owned()),
        );
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
