//! International phone number validation and normalization.
//!
//! Numbers are stored in a single dialable format: `+` followed by the
//! country calling code and national number, no separators, 8-18 characters
//! total. [`validate`] converts local-format input into that form using a
//! per-country rule table; already-dialable input is a fixed point, so
//! re-validating a stored number always succeeds with the identical value.

use serde::{Deserialize, Serialize};

/// Outcome of validating a raw phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneValidation {
    pub is_valid: bool,
    /// Dialable form, present iff `is_valid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,
    /// Human-readable rejection reason, present iff not `is_valid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PhoneValidation {
    fn valid(normalized: String) -> Self {
        Self {
            is_valid: true,
            normalized: Some(normalized),
            error: None,
        }
    }

    fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            normalized: None,
            error: Some(error.into()),
        }
    }
}

/// Per-country normalization rule.
struct CountryRule {
    /// ISO 3166-1 alpha-2 country code.
    country: &'static str,
    /// Display name used in error messages.
    name: &'static str,
    /// Country calling code digits, without `+`.
    calling_code: &'static str,
    /// Accepted national-number lengths after trunk-zero stripping.
    local_lengths: &'static [usize],
    /// Whether the local dialing convention prefixes a trunk `0`.
    strips_trunk_zero: bool,
}

const RULES: &[CountryRule] = &[
    CountryRule {
        country: "GH",
        name: "Ghana",
        calling_code: "233",
        local_lengths: &[9],
        strips_trunk_zero: true,
    },
    CountryRule {
        country: "NG",
        name: "Nigeria",
        calling_code: "234",
        local_lengths: &[10],
        strips_trunk_zero: true,
    },
    CountryRule {
        country: "KE",
        name: "Kenya",
        calling_code: "254",
        local_lengths: &[9],
        strips_trunk_zero: true,
    },
    CountryRule {
        country: "ZA",
        name: "South Africa",
        calling_code: "27",
        local_lengths: &[9],
        strips_trunk_zero: true,
    },
    CountryRule {
        country: "US",
        name: "United States",
        calling_code: "1",
        local_lengths: &[10],
        strips_trunk_zero: false,
    },
];

/// Strip every character except digits and a leading `+`.
fn clean(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut out = String::with_capacity(trimmed.len());
    if trimmed.starts_with('+') {
        out.push('+');
    }
    out.extend(trimmed.chars().filter(char::is_ascii_digit));
    out
}

/// Whether a string is already in the stored dialable format.
///
/// Accepts `+` followed by 7-17 digits not starting with `0` (a 1-4 digit
/// calling code plus a 4-14 digit national number, 8-18 characters total).
#[must_use]
pub fn is_dialable(phone: &str) -> bool {
    let Some(digits) = phone.strip_prefix('+') else {
        return false;
    };
    (7..=17).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
}

/// Validate a raw phone number against a 2-letter country hint, producing
/// the dialable form on success.
///
/// An empty or unrecognized country falls back to treating a bare 9-digit
/// local number as Ghanaian.
// TODO: the Ghana fallback mis-normalizes 9-digit locals from other markets;
// replace with a per-seller default country once profiles carry one.
#[must_use]
pub fn validate(raw: &str, country: &str) -> PhoneValidation {
    let cleaned = clean(raw);
    if cleaned.is_empty() || cleaned == "+" {
        return PhoneValidation::invalid("Phone number is required");
    }

    // Already-international input: accept as-is or reject, never rewrite.
    if cleaned.starts_with('+') {
        return if is_dialable(&cleaned) {
            PhoneValidation::valid(cleaned)
        } else {
            PhoneValidation::invalid(
                "International numbers must be + followed by 7-17 digits",
            )
        };
    }

    let rule = rule_for(country);
    let local = if rule.strips_trunk_zero {
        cleaned.strip_prefix('0').unwrap_or(&cleaned)
    } else {
        cleaned.as_str()
    };

    if rule.local_lengths.contains(&local.len()) {
        return PhoneValidation::valid(format!("+{}{}", rule.calling_code, local));
    }

    // Input already carries the calling code, just without the plus.
    if cleaned.starts_with(rule.calling_code) {
        let candidate = format!("+{cleaned}");
        if is_dialable(&candidate) {
            return PhoneValidation::valid(candidate);
        }
    }

    let expected = rule
        .local_lengths
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" or ");
    PhoneValidation::invalid(format!(
        "Invalid {} number: expected {} digits, got {}",
        rule.name,
        expected,
        local.len()
    ))
}

/// Whether a stored number predates normalization and should be corrected.
#[must_use]
pub fn needs_update(phone: &str) -> bool {
    !is_dialable(phone)
}

/// Cosmetic grouping for display. Never feed the output back into storage;
/// the dialable form is the canonical value.
#[must_use]
pub fn format_for_display(phone: &str) -> String {
    if !is_dialable(phone) {
        return phone.to_owned();
    }
    for rule in RULES {
        if let Some(national) = phone
            .strip_prefix('+')
            .and_then(|d| d.strip_prefix(rule.calling_code))
        {
            return format!("+{} {}", rule.calling_code, group_national(national));
        }
    }
    phone.to_owned()
}

/// Group a national number into 3-digit blocks with a leading 2/3-digit
/// operator prefix, e.g. `24 123 4567`.
fn group_national(digits: &str) -> String {
    match digits.len() {
        9 => format!("{} {} {}", &digits[..2], &digits[2..5], &digits[5..]),
        10 => format!("{} {} {}", &digits[..3], &digits[3..6], &digits[6..]),
        _ => digits.to_owned(),
    }
}

fn rule_for(country: &str) -> &'static CountryRule {
    let upper = country.trim().to_ascii_uppercase();
    RULES
        .iter()
        .find(|r| r.country == upper)
        .unwrap_or(&RULES[0])
}
