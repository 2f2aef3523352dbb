//! Canonical product shape.
//!
//! Serde field names match the remote wire shape (camelCase) so a serialized
//! canonical product re-normalizes to itself.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Image reference used when a product carries no images of its own.
pub const PLACEHOLDER_IMAGE: &str = "/images/product-placeholder.png";

/// Maximum length of the derived short description, before the ellipsis.
pub const SHORT_DESCRIPTION_LEN: usize = 100;

/// Lifecycle status of a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProductStatus {
    #[default]
    Active,
    OutOfStock,
    Archived,
}

impl ProductStatus {
    /// Whether products with this status appear in buyer-facing views.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Archived)
    }
}

/// Product description in both long and derived short form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    /// Long-form description text.
    pub full: String,
    /// Derived preview: `full` truncated to 100 characters, ellipsized
    /// only when truncation occurred.
    pub short: String,
}

impl Description {
    /// Build a description from long-form text, deriving the short form.
    #[must_use]
    pub fn from_full(full: impl Into<String>) -> Self {
        let full = full.into();
        let short = if full.chars().count() > SHORT_DESCRIPTION_LEN {
            let mut s: String = full.chars().take(SHORT_DESCRIPTION_LEN).collect();
            s.push_str("...");
            s
        } else {
            full.clone()
        };
        Self { full, short }
    }
}

/// Primary image plus ordered gallery of secondary references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImages {
    /// Primary image reference, shown in list views.
    pub primary: String,
    /// Secondary references, in display order.
    pub gallery: Vec<String>,
}

impl Default for ProductImages {
    fn default() -> Self {
        Self {
            primary: PLACEHOLDER_IMAGE.to_owned(),
            gallery: Vec::new(),
        }
    }
}

/// Interaction counters attached to every product record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Analytics {
    pub views: u64,
    pub contacts: u64,
    pub orders: u64,
    pub favorites: u64,
}

impl Analytics {
    /// Popularity score used by the `popular` sort key.
    #[must_use]
    pub const fn popularity(self) -> u64 {
        self.views + self.favorites
    }
}

/// Canonical product record.
///
/// All fields are always present after normalization; absent or malformed
/// wire data degrades to the documented defaults rather than erroring, so a
/// single bad record can never blank a catalog view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Identifier, unique within a seller's catalog.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Non-negative, currency-agnostic decimal price.
    pub price: Decimal,
    /// Units in stock.
    pub quantity: i64,
    /// Category label; empty input normalizes to `"Uncategorized"`.
    pub category: String,
    pub description: Description,
    pub images: ProductImages,
    /// Open string-keyed map: dimensions, weight, materials, care,
    /// condition, origin, brand, color, ...
    pub specifications: BTreeMap<String, String>,
    /// Ordered feature bullet points.
    pub features: Vec<String>,
    /// Ordered tags.
    pub tags: Vec<String>,
    pub status: ProductStatus,
    pub featured: bool,
    pub analytics: Analytics,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
    /// Last-update time, epoch milliseconds.
    pub updated_at: i64,
}

impl Product {
    /// Whether the record passes the sellable invariant (price > 0,
    /// quantity >= 0).
    #[must_use]
    pub fn is_sellable(&self) -> bool {
        self.price > Decimal::ZERO && self.quantity >= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_description_untouched_when_within_limit() {
        let d = Description::from_full("Hand-woven kente strip");
        assert_eq!(d.short, d.full);
    }

    #[test]
    fn short_description_ellipsized_when_truncated() {
        let long = "x".repeat(150);
        let d = Description::from_full(long);
        assert_eq!(d.short.chars().count(), SHORT_DESCRIPTION_LEN + 3);
        assert!(d.short.ends_with("..."));
    }

    #[test]
    fn short_description_counts_chars_not_bytes() {
        let long = "é".repeat(120);
        let d = Description::from_full(long);
        assert!(d.short.ends_with("..."));
        assert_eq!(d.short.chars().count(), SHORT_DESCRIPTION_LEN + 3);
    }

    #[test]
    fn default_images_resolve_to_placeholder() {
        let images = ProductImages::default();
        assert_eq!(images.primary, PLACEHOLDER_IMAGE);
        assert!(images.gallery.is_empty());
    }

    #[test]
    fn archived_products_are_not_visible() {
        assert!(ProductStatus::Active.is_visible());
        assert!(ProductStatus::OutOfStock.is_visible());
        assert!(!ProductStatus::Archived.is_visible());
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&ProductStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"out-of-stock\"");
    }
}
