//! Canonical seller profile shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Store name used when a profile carries none.
pub const DEFAULT_STORE_NAME: &str = "Store";

/// Payment methods seeded onto profiles that list none.
pub const DEFAULT_PAYMENT_METHODS: [&str; 3] = ["Mobile Money", "Cash on Delivery", "Bank Transfer"];

/// Delivery options seeded onto profiles that list none.
pub const DEFAULT_DELIVERY_OPTIONS: [&str; 2] = ["Pickup", "Local Delivery"];

/// Canonical seller profile.
///
/// `whatsapp_number` holds the normalized dialable form produced by
/// [`crate::phone::validate`]; legacy records may still carry local-format
/// numbers, which [`crate::phone::needs_update`] flags for correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: String,
    pub store_name: String,
    pub store_description: String,
    pub location: String,
    pub whatsapp_number: String,
    /// ISO 4217 currency code, e.g. `"GHS"`.
    pub currency: String,
    pub business_type: String,
    pub category: String,
    /// Never empty after standardization.
    pub payment_methods: Vec<String>,
    /// Never empty after standardization.
    pub delivery_options: Vec<String>,
    /// Platform name -> handle/URL.
    pub social_media: BTreeMap<String, String>,
    /// Policy name -> policy text (returns, shipping, ...).
    pub policies: BTreeMap<String, String>,
}
