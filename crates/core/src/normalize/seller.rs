//! Raw seller profile -> canonical [`Seller`] conversion.

use serde_json::Value;

use crate::phone;
use crate::types::Seller;
use crate::types::seller::{
    DEFAULT_DELIVERY_OPTIONS, DEFAULT_PAYMENT_METHODS, DEFAULT_STORE_NAME,
};

use super::{coerce_string_list, coerce_string_map, str_field, str_field_or};

/// Normalize a raw seller profile into the canonical shape.
///
/// Missing collections are seeded with sensible defaults so the contact and
/// checkout surfaces never render empty lists. Idempotent: standardizing a
/// serialized canonical seller returns the same seller.
#[must_use]
pub fn normalize_seller(raw: &Value) -> Seller {
    let mut payment_methods = coerce_string_list(raw.get("paymentMethods"));
    if payment_methods.is_empty() {
        payment_methods = DEFAULT_PAYMENT_METHODS.iter().map(|s| (*s).to_owned()).collect();
    }

    let mut delivery_options = coerce_string_list(raw.get("deliveryOptions"));
    if delivery_options.is_empty() {
        delivery_options = DEFAULT_DELIVERY_OPTIONS.iter().map(|s| (*s).to_owned()).collect();
    }

    Seller {
        id: str_field_or(raw, "id", ""),
        store_name: str_field_or(raw, "storeName", DEFAULT_STORE_NAME),
        store_description: str_field_or(raw, "storeDescription", ""),
        location: str_field_or(raw, "location", ""),
        whatsapp_number: normalize_whatsapp(raw),
        currency: str_field_or(raw, "currency", "GHS"),
        business_type: str_field_or(raw, "businessType", ""),
        category: str_field_or(raw, "category", ""),
        payment_methods,
        delivery_options,
        social_media: coerce_string_map(raw.get("socialMedia")),
        policies: coerce_string_map(raw.get("policies")),
    }
}

/// Bring the stored WhatsApp number into dialable form when possible.
///
/// Legacy local-format numbers that fail validation are kept verbatim;
/// [`phone::needs_update`] flags them so the owning seller can be prompted
/// to correct the profile.
fn normalize_whatsapp(raw: &Value) -> String {
    let Some(stored) = str_field(raw, "whatsappNumber") else {
        return String::new();
    };
    let country = str_field(raw, "country").unwrap_or_default();
    let result = phone::validate(&stored, &country);
    result.normalized.unwrap_or(stored)
}
