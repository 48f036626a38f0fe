//! Value normalization for rule values and record fields.
//!
//! Converts display strings such as `"1.5B"`, `"-5K"`, or `"12%"` to numbers.
//! Anything that cannot be converted is passed through unchanged; this never
//! fails.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use screener_model::{FieldValue, RawValue};

/// Keywords returned verbatim even when they would otherwise parse.
const SENTINEL_KEYWORDS: &[&str] = &["any", "call", "put", "stock", "etf"];

/// Decimal with optional sign and optional magnitude suffix (B, M, K).
static MAGNITUDE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(-?\d+(?:\.\d+)?)([bmk])?$").expect("Invalid magnitude regex")
});

/// A value in comparable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<NormalizedValue>),
}

impl NormalizedValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NormalizedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NormalizedValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Empty range bound: null or a blank string.
    pub fn is_unbounded(&self) -> bool {
        match self {
            NormalizedValue::Null => true,
            NormalizedValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// The `"any"` keyword in any casing.
    pub fn is_wildcard(&self) -> bool {
        self.as_str()
            .is_some_and(|text| text.trim().eq_ignore_ascii_case("any"))
    }
}

impl fmt::Display for NormalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedValue::Null => write!(f, "null"),
            NormalizedValue::Bool(flag) => write!(f, "{flag}"),
            NormalizedValue::Number(n) => write!(f, "{n}"),
            NormalizedValue::Text(text) => write!(f, "{text:?}"),
            NormalizedValue::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// Normalize a raw rule value. Lists are normalized elementwise.
pub fn normalize(input: &RawValue) -> NormalizedValue {
    match input {
        RawValue::Null => NormalizedValue::Null,
        RawValue::Bool(flag) => NormalizedValue::Bool(*flag),
        RawValue::Number(n) => NormalizedValue::Number(*n),
        RawValue::Text(text) => normalize_str(text),
        RawValue::List(items) => NormalizedValue::List(items.iter().map(normalize).collect()),
    }
}

/// Normalize a record field read through the typed accessor.
pub fn normalize_field(field: FieldValue<'_>) -> NormalizedValue {
    match field {
        FieldValue::Number(n) => NormalizedValue::Number(n),
        FieldValue::Text(text) => normalize_str(text),
        FieldValue::Absent => NormalizedValue::Null,
        FieldValue::Unsupported(_) => normalize(&field.to_raw()),
    }
}

/// Normalize a single string.
///
/// Percentages keep their face value (`"12%"` becomes `12`, not `0.12`).
pub fn normalize_str(input: &str) -> NormalizedValue {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();
    if SENTINEL_KEYWORDS.contains(&lower.as_str()) {
        return NormalizedValue::Text(input.to_string());
    }

    if let Some(number) = trimmed.strip_suffix('%') {
        return match parse_finite(number) {
            Some(value) => NormalizedValue::Number(value),
            None => {
                warn!(value = input, "unparseable percentage, keeping raw value");
                NormalizedValue::Text(input.to_string())
            }
        };
    }

    if let Some(captures) = MAGNITUDE_REGEX.captures(trimmed) {
        if let Some(value) = captures.get(1).and_then(|m| parse_finite(m.as_str())) {
            let multiplier = captures
                .get(2)
                .map_or(1.0, |unit| unit_multiplier(unit.as_str()));
            return NormalizedValue::Number(value * multiplier);
        }
    }

    if let Some(value) = parse_finite(trimmed) {
        return NormalizedValue::Number(value);
    }

    if looks_numeric(trimmed) {
        warn!(value = input, "unparseable numeric value, keeping raw value");
    } else {
        trace!(value = input, "non-numeric value passed through");
    }
    NormalizedValue::Text(input.to_string())
}

fn unit_multiplier(unit: &str) -> f64 {
    match unit {
        "B" | "b" => 1_000_000_000.0,
        "M" | "m" => 1_000_000.0,
        "K" | "k" => 1_000.0,
        _ => 1.0,
    }
}

/// Parse a float, rejecting blanks and the `inf`/`nan` spellings.
fn parse_finite(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn looks_numeric(value: &str) -> bool {
    let unsigned = value.trim_start_matches(['-', '+']);
    unsigned
        .chars()
        .next()
        .is_some_and(|ch| ch.is_ascii_digit() || ch == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: f64) -> NormalizedValue {
        NormalizedValue::Number(value)
    }

    fn text(value: &str) -> NormalizedValue {
        NormalizedValue::Text(value.to_string())
    }

    #[test]
    fn unit_suffixes_scale() {
        assert_eq!(normalize_str("1.5B"), num(1_500_000_000.0));
        assert_eq!(normalize_str("250M"), num(250_000_000.0));
        assert_eq!(normalize_str("100K"), num(100_000.0));
        assert_eq!(normalize_str("-5K"), num(-5_000.0));
        assert_eq!(normalize_str("2.5m"), num(2_500_000.0));
        assert_eq!(normalize_str("42"), num(42.0));
    }

    #[test]
    fn percent_keeps_face_value() {
        assert_eq!(normalize_str("12%"), num(12.0));
        assert_eq!(normalize_str("-3.5%"), num(-3.5));
        assert_eq!(normalize_str("abc%"), text("abc%"));
        assert_eq!(normalize_str("%"), text("%"));
    }

    #[test]
    fn sentinels_are_never_coerced() {
        for keyword in ["any", "ANY", "Call", "put", "Stock", "ETF"] {
            assert_eq!(normalize_str(keyword), text(keyword));
        }
    }

    #[test]
    fn unparseable_passes_through() {
        assert_eq!(normalize_str("abc"), text("abc"));
        assert_eq!(normalize_str("12abc"), text("12abc"));
        assert_eq!(normalize_str(""), text(""));
        assert_eq!(normalize_str("inf"), text("inf"));
        assert_eq!(normalize_str("NaN"), text("NaN"));
    }

    #[test]
    fn plain_floats_parse() {
        assert_eq!(normalize_str("1e3"), num(1000.0));
        assert_eq!(normalize_str(" 0.25 "), num(0.25));
    }

    #[test]
    fn lists_normalize_elementwise() {
        let raw = RawValue::from(vec!["10K", "", "any"]);
        assert_eq!(
            normalize(&raw),
            NormalizedValue::List(vec![num(10_000.0), text(""), text("any")])
        );
    }

    #[test]
    fn numbers_and_nulls_are_unchanged() {
        assert_eq!(normalize(&RawValue::Number(7.5)), num(7.5));
        assert_eq!(normalize(&RawValue::Null), NormalizedValue::Null);
        assert_eq!(normalize(&RawValue::Bool(true)), NormalizedValue::Bool(true));
    }

    #[test]
    fn fields_normalize_like_rule_values() {
        assert_eq!(normalize_field(FieldValue::Text("2M")), num(2_000_000.0));
        assert_eq!(normalize_field(FieldValue::Number(3.0)), num(3.0));
        assert_eq!(normalize_field(FieldValue::Absent), NormalizedValue::Null);
    }

    #[test]
    fn bound_and_wildcard_helpers() {
        assert!(NormalizedValue::Null.is_unbounded());
        assert!(text("  ").is_unbounded());
        assert!(!num(0.0).is_unbounded());
        assert!(text("Any").is_wildcard());
        assert!(!text("anything").is_wildcard());
    }
}
