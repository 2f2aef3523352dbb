//! Integration tests for composed WhatsApp messages and deep links, built
//! from records as the remote store delivers them.

use serde_json::json;

use makola_core::links::{parse_store_url, wa_link};
use makola_core::messages::{CustomerDetails, build_order_message, build_store_share, inquiry_link};
use makola_core::normalize::{normalize_product_keyed, normalize_seller};

fn seller() -> makola_core::Seller {
    normalize_seller(&json!({
        "id": "s1",
        "storeName": "Adoma Crafts",
        "storeDescription": "Handmade goods from Accra",
        "whatsappNumber": "0241234567",
        "country": "GH",
    }))
}

fn product() -> makola_core::Product {
    normalize_product_keyed(
        "p1",
        &json!({
            "name": "Kente stole",
            "price": "80",
            "description": "Hand woven in Bonwire",
        }),
    )
}

#[test]
fn test_inquiry_link_dials_normalized_number() {
    // The raw profile carried a local-format number; the link must use the
    // dialable form with the country code and no plus sign.
    let link = inquiry_link(&seller(), &product(), "Kofi");
    assert!(link.starts_with("https://wa.me/233241234567?text="));
}

#[test]
fn test_inquiry_message_round_trips_through_link() {
    let link = inquiry_link(&seller(), &product(), "Kofi");
    let encoded = link.split("text=").nth(1).unwrap();
    let message = urlencoding::decode(encoded).unwrap();

    assert!(message.contains("Hello Adoma Crafts!"));
    assert!(message.contains("*Kente stole*"));
    assert!(message.contains("Price: GHS 80"));
    assert!(message.ends_with("- Kofi"));
}

#[test]
fn test_order_total_uses_normalized_price() {
    let customer = CustomerDetails {
        name: "Ama Serwaa".to_owned(),
        phone: "+233209876543".to_owned(),
        delivery_address: "14 Ring Road, Accra".to_owned(),
        note: "Call before delivery".to_owned(),
    };
    let message = build_order_message(&seller(), &product(), 3, &customer);

    assert!(message.contains("Unit price: GHS 80"));
    assert!(message.contains("Total: GHS 240"));
    assert!(message.contains("Note: Call before delivery"));

    // The full order survives URL encoding byte for byte.
    let link = wa_link(&seller().whatsapp_number, &message);
    let encoded = link.split("text=").nth(1).unwrap();
    assert_eq!(urlencoding::decode(encoded).unwrap(), message);
}

#[test]
fn test_store_share_link_parses_back() {
    let message = build_store_share(&seller(), "https://makola.app");
    let url = message.lines().last().unwrap();

    let parsed = parse_store_url(url).unwrap();
    assert_eq!(parsed.seller_id, "s1");
    assert!(parsed.product_id.is_none());
}
