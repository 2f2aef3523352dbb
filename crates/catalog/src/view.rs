//! Derived catalog views: filter, sort, and search.
//!
//! Pure functions over the cached product list. The engine recomputes
//! synchronously on every cache or query-state change; debouncing keystrokes
//! is the UI boundary's job, and catalogs in the low thousands recompute
//! cheaply enough without it.

use std::collections::HashSet;

use makola_core::Product;

/// Sort order for the derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Price ascending.
    PriceLow,
    /// Price descending.
    PriceHigh,
    /// Display name, lexicographic.
    Name,
    /// `created_at` descending.
    #[default]
    Newest,
    /// `views + favorites` descending, ties by `created_at` descending.
    Popular,
}

/// Query state for one derived view.
#[derive(Debug, Clone, Default)]
pub struct ViewQuery {
    /// Free-text search; empty matches everything.
    pub query: String,
    /// Category filter; `"all"` (or empty) passes everything.
    pub category: String,
    /// When set, keep only products in `favorites`.
    pub favorites_only: bool,
    /// Favorite product identifiers for the current viewer.
    pub favorites: HashSet<String>,
    pub sort: SortKey,
}

/// Compute the filtered, sorted view of `products`.
///
/// Filters are conjunctive and order-independent; sorting is applied last.
#[must_use]
pub fn derive_view(products: &[Product], query: &ViewQuery) -> Vec<Product> {
    let terms: Vec<String> = query
        .query
        .to_lowercase()
        .split_whitespace()
        .map(ToOwned::to_owned)
        .collect();

    let mut out: Vec<Product> = products
        .iter()
        .filter(|p| matches_terms(p, &terms))
        .filter(|p| matches_category(p, &query.category))
        .filter(|p| !query.favorites_only || query.favorites.contains(&p.id))
        .cloned()
        .collect();

    sort_products(&mut out, query.sort);
    out
}

/// Every term must appear somewhere in the product's searchable text.
fn matches_terms(product: &Product, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let haystack = search_haystack(product);
    terms.iter().all(|term| haystack.contains(term.as_str()))
}

/// Concatenated lower-cased searchable fields: name, description, category,
/// and the brand/material/color specifications.
fn search_haystack(product: &Product) -> String {
    let spec = |key: &str| {
        product
            .specifications
            .get(key)
            .map(String::as_str)
            .unwrap_or_default()
    };
    format!(
        "{} {} {} {} {} {}",
        product.name,
        product.description.full,
        product.category,
        spec("brand"),
        spec("material"),
        spec("color"),
    )
    .to_lowercase()
}

fn matches_category(product: &Product, category: &str) -> bool {
    category.is_empty() || category == "all" || product.category == category
}

fn sort_products(products: &mut [Product], sort: SortKey) {
    match sort {
        SortKey::PriceLow => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceHigh => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Name => products.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Popular => products.sort_by(|a, b| {
            b.analytics
                .popularity()
                .cmp(&a.analytics.popularity())
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
    }
}
