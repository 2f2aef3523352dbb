//! Raw product record -> canonical [`Product`] conversion.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::{Analytics, Description, Product, ProductImages, ProductStatus};

use super::{
    coerce_bool, coerce_count, coerce_decimal, coerce_epoch_ms, coerce_string,
    coerce_string_list, coerce_string_map, coerce_u64, str_field, str_field_or,
};

/// Legacy top-level fields lifted into the specifications map when present.
const LIFTED_SPEC_FIELDS: &[&str] = &[
    "brand",
    "material",
    "color",
    "condition",
    "weight",
    "dimensions",
    "origin",
    "care",
];

/// Normalize a raw product record into the canonical shape.
///
/// Total and idempotent: any JSON value yields a `Product`, and
/// re-normalizing a serialized canonical product returns the same product.
#[must_use]
pub fn normalize_product(raw: &Value) -> Product {
    let now = chrono::Utc::now().timestamp_millis();
    let created_at = coerce_epoch_ms(raw.get("createdAt"), now);

    Product {
        id: str_field_or(raw, "id", ""),
        name: str_field_or(raw, "name", ""),
        price: coerce_decimal(raw.get("price")),
        quantity: coerce_count(raw.get("quantity")),
        category: str_field_or(raw, "category", "Uncategorized"),
        description: parse_description(raw),
        images: parse_images(raw),
        specifications: parse_specifications(raw),
        features: coerce_string_list(raw.get("features")),
        tags: coerce_string_list(raw.get("tags")),
        status: parse_status(raw.get("status")),
        featured: coerce_bool(raw.get("featured")),
        analytics: parse_analytics(raw.get("analytics")),
        created_at,
        updated_at: coerce_epoch_ms(raw.get("updatedAt"), created_at),
    }
}

/// Normalize a raw product record whose identifier lives outside the record
/// body (the remote store keys records by an opaque document id).
///
/// An `id` field inside the record wins over the key.
#[must_use]
pub fn normalize_product_keyed(key: &str, raw: &Value) -> Product {
    let mut product = normalize_product(raw);
    if product.id.is_empty() {
        product.id = key.to_owned();
    }
    product
}

/// Resolve the historical description variants: a bare string, or an object
/// carrying `full` (preferred) and/or `short`.
///
/// The short form is always re-derived from the full text so the ellipsis
/// rule stays consistent regardless of what was stored.
fn parse_description(raw: &Value) -> Description {
    let full = match raw.get("description") {
        Some(Value::String(s)) => s.trim().to_owned(),
        Some(d @ Value::Object(_)) => str_field(d, "full")
            .or_else(|| str_field(d, "short"))
            .unwrap_or_default(),
        _ => String::new(),
    };
    Description::from_full(full)
}

/// Resolve the historical image variants: a bare URL string, an array of
/// URLs, a `{primary, gallery}` object, or nothing at all.
fn parse_images(raw: &Value) -> ProductImages {
    let value = raw
        .get("images")
        .or_else(|| raw.get("image"))
        .or_else(|| raw.get("imageUrl"));

    match value {
        Some(Value::String(url)) if !url.trim().is_empty() => ProductImages {
            primary: url.trim().to_owned(),
            gallery: Vec::new(),
        },
        Some(Value::Array(_)) => {
            let mut urls = coerce_string_list(value);
            if urls.is_empty() {
                ProductImages::default()
            } else {
                let primary = urls.remove(0);
                ProductImages {
                    primary,
                    gallery: urls,
                }
            }
        }
        Some(obj @ Value::Object(_)) => {
            let primary = str_field(obj, "primary");
            let gallery = coerce_string_list(obj.get("gallery"));
            match primary {
                Some(primary) => ProductImages { primary, gallery },
                // A gallery without a primary promotes its first entry.
                None => {
                    let mut gallery = gallery;
                    if gallery.is_empty() {
                        ProductImages::default()
                    } else {
                        let primary = gallery.remove(0);
                        ProductImages { primary, gallery }
                    }
                }
            }
        }
        _ => ProductImages::default(),
    }
}

/// Merge the specifications map with legacy top-level spec fields.
fn parse_specifications(raw: &Value) -> BTreeMap<String, String> {
    let mut specs = coerce_string_map(raw.get("specifications"));
    for key in LIFTED_SPEC_FIELDS {
        if !specs.contains_key(*key) {
            if let Some(value) = raw.get(*key).and_then(coerce_string) {
                let value = value.trim().to_owned();
                if !value.is_empty() {
                    specs.insert((*key).to_owned(), value);
                }
            }
        }
    }
    specs
}

/// Parse the status field across its historical spellings; unknown values
/// degrade to active rather than hiding the product.
fn parse_status(value: Option<&Value>) -> ProductStatus {
    let Some(s) = value.and_then(Value::as_str) else {
        return ProductStatus::Active;
    };
    match s.trim().to_ascii_lowercase().as_str() {
        "out-of-stock" | "out_of_stock" | "outofstock" | "sold-out" | "sold_out" => {
            ProductStatus::OutOfStock
        }
        "archived" | "deleted" | "inactive" => ProductStatus::Archived,
        _ => ProductStatus::Active,
    }
}

fn parse_analytics(value: Option<&Value>) -> Analytics {
    let Some(obj) = value else {
        return Analytics::default();
    };
    Analytics {
        views: coerce_u64(obj.get("views")),
        contacts: coerce_u64(obj.get("contacts")),
        orders: coerce_u64(obj.get("orders")),
        favorites: coerce_u64(obj.get("favorites")),
    }
}
