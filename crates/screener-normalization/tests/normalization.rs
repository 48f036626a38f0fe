//! Property tests for value and index-key normalization.

use proptest::prelude::*;

use screener_model::RawValue;
use screener_normalization::{NormalizedValue, normalize, normalize_key, normalize_str};

proptest! {
    #[test]
    fn index_key_is_idempotent(raw in ".{0,40}") {
        let once = normalize_key(&raw);
        prop_assert_eq!(normalize_key(&once), once);
    }

    #[test]
    fn index_key_output_is_lowercase_alphanumeric(raw in ".{0,40}") {
        let key = normalize_key(&raw);
        prop_assert!(key.chars().all(char::is_alphanumeric));
        prop_assert_eq!(key.to_lowercase(), key);
    }

    #[test]
    fn thousands_suffix_scales_integers(value in -1_000_000i64..1_000_000) {
        let normalized = normalize_str(&format!("{value}K"));
        prop_assert_eq!(normalized, NormalizedValue::Number(value as f64 * 1_000.0));
    }

    #[test]
    fn percent_matches_plain_number(value in -10_000i64..10_000) {
        prop_assert_eq!(
            normalize_str(&format!("{value}%")),
            normalize_str(&value.to_string())
        );
    }

    #[test]
    fn list_normalization_preserves_length(
        items in prop::collection::vec("[0-9A-Za-z%.-]{0,6}", 0..8),
    ) {
        let raw = RawValue::List(
            items.iter().map(|item| RawValue::from(item.as_str())).collect(),
        );
        match normalize(&raw) {
            NormalizedValue::List(normalized) => prop_assert_eq!(normalized.len(), items.len()),
            other => prop_assert!(false, "expected list, got {other:?}"),
        }
    }

    #[test]
    fn normalization_is_deterministic(raw in ".{0,12}") {
        prop_assert_eq!(normalize_str(&raw), normalize_str(&raw));
    }
}

#[test]
fn display_strings_convert() {
    assert_eq!(normalize_str("1.5B"), NormalizedValue::Number(1_500_000_000.0));
    assert_eq!(normalize_str("250M"), NormalizedValue::Number(250_000_000.0));
    assert_eq!(normalize_str("12%"), NormalizedValue::Number(12.0));
    assert_eq!(normalize_str("abc"), NormalizedValue::Text("abc".to_string()));
    assert_eq!(normalize_str("-5K"), NormalizedValue::Number(-5_000.0));
}
