//! Outbound WhatsApp message composition.
//!
//! One builder per contact scenario. Composition is deterministic: the same
//! inputs always produce a byte-identical message, because the text becomes
//! part of a deep-link URL and tests assert on the exact round trip.

use crate::links;
use crate::types::{Product, Seller};

/// Buyer details attached to an order message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub delivery_address: String,
    /// Free-form note, omitted from the message when empty.
    pub note: String,
}

/// Compose a product inquiry from a browsing buyer.
#[must_use]
pub fn build_product_inquiry(seller: &Seller, product: &Product, customer_name: &str) -> String {
    let mut lines = vec![
        format!("Hello {}!", seller.store_name),
        String::new(),
        "I'm interested in this product from your catalog:".to_owned(),
        String::new(),
        format!("*{}*", product.name),
        format!("Price: {} {}", seller.currency, product.price),
    ];
    if !product.description.short.is_empty() {
        lines.push(product.description.short.clone());
    }
    lines.push(String::new());
    lines.push("Is it still available?".to_owned());
    if !customer_name.is_empty() {
        lines.push(String::new());
        lines.push(format!("- {customer_name}"));
    }
    lines.join("\n")
}

/// Compose an order placement message.
#[must_use]
pub fn build_order_message(
    seller: &Seller,
    product: &Product,
    quantity: u32,
    customer: &CustomerDetails,
) -> String {
    let total = product.price * rust_decimal::Decimal::from(quantity);
    let mut lines = vec![
        format!("Hello {}, I would like to place an order.", seller.store_name),
        String::new(),
        "*Order details*".to_owned(),
        format!("Product: {}", product.name),
        format!("Quantity: {quantity}"),
        format!("Unit price: {} {}", seller.currency, product.price),
        format!("Total: {} {total}", seller.currency),
        String::new(),
        "*My details*".to_owned(),
        format!("Name: {}", customer.name),
        format!("Phone: {}", customer.phone),
        format!("Delivery address: {}", customer.delivery_address),
    ];
    if !customer.note.is_empty() {
        lines.push(format!("Note: {}", customer.note));
    }
    lines.join("\n")
}

/// Compose a store-share message with the public catalog link.
#[must_use]
pub fn build_store_share(seller: &Seller, origin: &str) -> String {
    let url = links::store_url(origin, &seller.id, None);
    let mut lines = vec![format!("Check out {} on Makola!", seller.store_name)];
    if !seller.store_description.is_empty() {
        lines.push(String::new());
        lines.push(seller.store_description.clone());
    }
    lines.push(String::new());
    lines.push(url);
    lines.join("\n")
}

/// Compose a status broadcast announcing products, newest first as given.
#[must_use]
pub fn build_status_broadcast(seller: &Seller, products: &[Product], origin: &str) -> String {
    let mut lines = vec![
        format!("New at {}:", seller.store_name),
        String::new(),
    ];
    for product in products {
        lines.push(format!(
            "• {} - {} {}",
            product.name, seller.currency, product.price
        ));
    }
    lines.push(String::new());
    lines.push(format!("Browse the full catalog: {}", links::store_url(origin, &seller.id, None)));
    lines.join("\n")
}

/// Compose a product inquiry and wrap it into the browser deep link.
///
/// Convenience used by the "Contact seller" action.
#[must_use]
pub fn inquiry_link(seller: &Seller, product: &Product, customer_name: &str) -> String {
    let message = build_product_inquiry(seller, product, customer_name);
    links::wa_link(&seller.whatsapp_number, &message)
}
