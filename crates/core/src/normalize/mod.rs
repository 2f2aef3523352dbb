//! Boundary normalization from raw remote records to canonical shapes.
//!
//! The remote store holds records written by several generations of clients:
//! images may be a bare URL string, an array of URLs, or a
//! `{primary, gallery}` object; descriptions may be a string or a
//! `{short, full}` object; numbers arrive as numbers or strings. All of that
//! variance is resolved here, exactly once. Downstream code never branches
//! on wire shape.
//!
//! Every function in this module is total: unparseable fields degrade to
//! safe defaults instead of erroring, because the catalog must keep
//! rendering even when one record is malformed. Normalization is also
//! idempotent - re-normalizing a serialized canonical record yields the
//! same record.

mod product;
mod seller;

pub use product::{normalize_product, normalize_product_keyed};
pub use seller::normalize_seller;

use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Coerce a JSON value to a string: strings pass through, numbers are
/// formatted, everything else is `None`.
fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a string field, trimmed, treating absent/blank/non-string as `None`.
fn str_field(raw: &Value, key: &str) -> Option<String> {
    let s = raw.get(key).and_then(coerce_string)?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Read a string field with a fallback default.
fn str_field_or(raw: &Value, key: &str, default: &str) -> String {
    str_field(raw, key).unwrap_or_else(|| default.to_owned())
}

/// Coerce a JSON value to a non-negative decimal; non-numeric input
/// degrades to zero.
fn coerce_decimal(value: Option<&Value>) -> Decimal {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        Some(Value::String(s)) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    };
    parsed.filter(|d| !d.is_sign_negative()).unwrap_or(Decimal::ZERO)
}

/// Coerce a JSON value to a non-negative integer; non-numeric input
/// degrades to zero.
fn coerce_count(value: Option<&Value>) -> i64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.filter(|n| *n >= 0).unwrap_or(0)
}

/// Coerce a JSON value to an unsigned counter.
fn coerce_u64(value: Option<&Value>) -> u64 {
    u64::try_from(coerce_count(value)).unwrap_or(0)
}

/// Coerce a JSON value to epoch milliseconds, defaulting to `now`.
///
/// Accepts a numeric epoch (milliseconds), a numeric string, or an RFC 3339
/// timestamp string.
fn coerce_epoch_ms(value: Option<&Value>, now: i64) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(now),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                chrono::DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.timestamp_millis())
            })
            .unwrap_or(now)
        }
        _ => now,
    }
}

/// Coerce a JSON value to a boolean: accepts bools, `"true"`/`"false"`, and
/// numeric 0/1.
fn coerce_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        _ => false,
    }
}

/// Coerce a JSON value to an ordered list of non-empty strings: accepts an
/// array or a single bare string.
fn coerce_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(coerce_string)
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(v) => coerce_string(v)
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .map(|s| vec![s])
            .unwrap_or_default(),
        None => Vec::new(),
    }
}

/// Coerce a JSON object to a string->string map, dropping non-scalar values.
fn coerce_string_map(value: Option<&Value>) -> BTreeMap<String, String> {
    let Some(Value::Object(fields)) = value else {
        return BTreeMap::new();
    };
    fields
        .iter()
        .filter_map(|(k, v)| {
            let v = coerce_string(v)?;
            let v = v.trim();
            if v.is_empty() {
                None
            } else {
                Some((k.clone(), v.to_owned()))
            }
        })
        .collect()
}
