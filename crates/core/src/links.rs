//! Deep links and public catalog URLs.
//!
//! The `wa.me` format is load-bearing for the messaging client and must not
//! change: `https://wa.me/<digits>?text=<encoded>` with no extra query
//! parameters and no `+` in the digit segment.

use url::Url;

/// A parsed public catalog link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLink {
    pub seller_id: String,
    /// Product pre-selected via the URL fragment, if any.
    pub product_id: Option<String>,
}

/// Build the browser deep link that opens WhatsApp pre-filled with `message`.
#[must_use]
pub fn wa_link(phone: &str, message: &str) -> String {
    let digits = dial_digits(phone);
    format!("https://wa.me/{digits}?text={}", urlencoding::encode(message))
}

/// Build the client-native scheme variant for on-device delivery.
///
/// Which variant to open is the calling UI's decision; see
/// [`is_mobile_user_agent`].
#[must_use]
pub fn wa_scheme_link(phone: &str, message: &str) -> String {
    let digits = dial_digits(phone);
    format!(
        "whatsapp://send?phone={digits}&text={}",
        urlencoding::encode(message)
    )
}

/// Device-class predicate for choosing between [`wa_link`] and
/// [`wa_scheme_link`]. Exposed for the UI layer; nothing in this engine
/// acts on it.
#[must_use]
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    ["android", "iphone", "ipad", "ipod", "mobile"]
        .iter()
        .any(|needle| ua.contains(needle))
}

/// Build a public catalog URL: `<origin>/store/<sellerId>` with an optional
/// `#<productId>` fragment for product deep-linking.
#[must_use]
pub fn store_url(origin: &str, seller_id: &str, product_id: Option<&str>) -> String {
    let base = origin.trim_end_matches('/');
    match product_id {
        Some(product_id) => format!("{base}/store/{seller_id}#{product_id}"),
        None => format!("{base}/store/{seller_id}"),
    }
}

/// Parse a public catalog URL back into its parts.
///
/// Returns `None` for URLs that do not follow the `/store/<sellerId>`
/// convention.
#[must_use]
pub fn parse_store_url(raw: &str) -> Option<StoreLink> {
    let url = Url::parse(raw).ok()?;
    let mut segments = url.path_segments()?;
    if segments.next()? != "store" {
        return None;
    }
    let seller_id = segments.next().filter(|s| !s.is_empty())?.to_owned();
    let product_id = url
        .fragment()
        .filter(|f| !f.is_empty())
        .map(ToOwned::to_owned);
    Some(StoreLink {
        seller_id,
        product_id,
    })
}

fn dial_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}
