//! Normalization of display-oriented rule and record values.
//!
//! - [`value`]: percent/unit-suffixed strings to comparable numbers.
//! - [`index_key`]: cosmetic variants of index names to one lookup key.

pub mod index_key;
pub mod value;

pub use index_key::normalize_key;
pub use value::{NormalizedValue, normalize, normalize_field, normalize_str};
