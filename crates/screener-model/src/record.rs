//! Instrument records and typed field access.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value::RawValue;

/// One tradable instrument as delivered by the upstream data source.
///
/// The field set is open-ended, so the record keeps the caller's JSON value
/// as-is and is written back out unchanged. A batch element that is not a JSON
/// object is still a record: it has no fields and fails every field predicate.
/// Predicates never read raw JSON; they go through [`Record::field`], which
/// yields a [`FieldValue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

/// Typed view of a single record field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
    /// Missing key or explicit JSON `null`.
    Absent,
    /// Present but not a scalar this engine compares (booleans, arrays, objects).
    Unsupported(&'a Value),
}

impl<'a> FieldValue<'a> {
    fn from_json(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldValue::Absent,
            Some(raw @ Value::Number(number)) => number
                .as_f64()
                .map_or(FieldValue::Unsupported(raw), FieldValue::Number),
            Some(Value::String(text)) => FieldValue::Text(text),
            Some(other) => FieldValue::Unsupported(other),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Raw form of the field for normalization and sequence membership.
    pub fn to_raw(&self) -> RawValue {
        match self {
            FieldValue::Number(n) => RawValue::Number(*n),
            FieldValue::Text(text) => RawValue::Text((*text).to_string()),
            FieldValue::Absent => RawValue::Null,
            FieldValue::Unsupported(Value::Bool(flag)) => RawValue::Bool(*flag),
            FieldValue::Unsupported(_) => RawValue::Null,
        }
    }
}

impl Default for Record {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field by rule name: exact key first, then ASCII case-insensitive.
    pub fn field(&self, name: &str) -> FieldValue<'_> {
        let Some(map) = self.as_map() else {
            return FieldValue::Absent;
        };
        if let Some(value) = map.get(name) {
            return FieldValue::from_json(Some(value));
        }
        let value = map
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value);
        FieldValue::from_json(value)
    }

    /// Upper-cased symbol from the given field, or `None` when absent or blank.
    pub fn symbol(&self, field: &str) -> Option<String> {
        match self.field(field) {
            FieldValue::Text(text) if !text.trim().is_empty() => {
                Some(text.trim().to_uppercase())
            }
            _ => None,
        }
    }

    /// Set a field. A non-object record is replaced by a fresh object.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        if let Value::Object(map) = &mut self.0 {
            map.insert(name.into(), value.into());
        } else {
            let mut map = Map::new();
            map.insert(name.into(), value.into());
            self.0 = Value::Object(map);
        }
    }

    /// Builder-style insert, handy for assembling fixtures.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.as_map().map_or(0, Map::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(Value::Object(map))
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect::<Map<String, Value>>(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::new()
            .with("symbol", "aapl")
            .with("premium", 500_000)
            .with("assetType", "stock")
            .with("sector", Value::Null)
            .with("flags", vec!["x"])
    }

    #[test]
    fn typed_access_by_name() {
        let record = sample();
        assert_eq!(record.field("premium"), FieldValue::Number(500_000.0));
        assert_eq!(record.field("assetType"), FieldValue::Text("stock"));
        assert!(record.field("sector").is_absent());
        assert!(record.field("missing").is_absent());
        assert!(matches!(record.field("flags"), FieldValue::Unsupported(_)));
    }

    #[test]
    fn lookup_falls_back_to_case_insensitive() {
        let record = sample();
        assert_eq!(record.field("ASSETTYPE"), FieldValue::Text("stock"));
        assert_eq!(record.field("Premium"), FieldValue::Number(500_000.0));
    }

    #[test]
    fn symbol_is_upper_cased_and_blank_is_none() {
        assert_eq!(sample().symbol("symbol"), Some("AAPL".to_string()));
        assert_eq!(sample().symbol("SYMBOL"), Some("AAPL".to_string()));
        let blank = Record::new().with("symbol", "  ");
        assert_eq!(blank.symbol("symbol"), None);
        let numeric = Record::new().with("symbol", 42);
        assert_eq!(numeric.symbol("symbol"), None);
    }

    #[test]
    fn serializes_transparently() {
        let record = Record::new().with("symbol", "TSLA").with("premium", 50);
        let json = serde_json::to_string(&record).expect("serialize record");
        let round: Record = serde_json::from_str(&json).expect("deserialize record");
        assert_eq!(round, record);
        assert_eq!(round.len(), 2);
    }

    #[test]
    fn non_object_records_have_no_fields() {
        let record: Record = serde_json::from_str("7").expect("deserialize scalar record");
        assert!(!record.is_object());
        assert!(record.is_empty());
        assert!(record.field("premium").is_absent());
        assert_eq!(record.symbol("symbol"), None);
        assert_eq!(serde_json::to_string(&record).expect("serialize"), "7");
    }
}
