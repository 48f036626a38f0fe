//! Canonical lookup keys for index/group names.

/// Collapse cosmetic variants of an index name to one lookup key.
///
/// Lower-cases, drops whitespace and punctuation, and folds the
/// "S&P" / "S & P" / "S and P" spellings to `sp`, so `"S&P 100"`,
/// `"s&p100"` and `"s and p 100"` all become `"sp100"`. Idempotent.
pub fn normalize_key(raw: &str) -> String {
    // Lower-case before filtering: some lowercase mappings emit combining marks.
    let compact: String = raw
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|ch| ch.is_alphanumeric())
        .collect();
    // "s&p" loses its ampersand above; "s and p" is left as "sandp".
    compact.replace("sandp", "sp")
}
