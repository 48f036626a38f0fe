//! Raw rule values as authored by the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A rule value before normalization.
///
/// Rule values arrive as display-oriented JSON: plain numbers, numeric or
/// unit-suffixed strings (`"1.5B"`, `"12%"`), sentinel keywords (`"any"`,
/// `"call"`), or arrays of any of these (range bounds, accepted categories,
/// requested index names).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<RawValue>),
}

impl RawValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// True for the literal wildcard keyword `"any"` (exact spelling).
    pub fn is_any_literal(&self) -> bool {
        self.as_str() == Some("any")
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => write!(f, "null"),
            RawValue::Bool(value) => write!(f, "{value}"),
            RawValue::Number(value) => write!(f, "{value}"),
            RawValue::Text(value) => write!(f, "{value}"),
            RawValue::List(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Number(f64::from(value))
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value as f64)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(values: Vec<T>) -> Self {
        RawValue::List(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_mixed_shapes() {
        let value: RawValue =
            serde_json::from_str(r#"["10", 20, null, "1.5B"]"#).expect("parse list");
        assert_eq!(
            value,
            RawValue::List(vec![
                RawValue::Text("10".to_string()),
                RawValue::Number(20.0),
                RawValue::Null,
                RawValue::Text("1.5B".to_string()),
            ])
        );
    }

    #[test]
    fn any_literal_is_exact() {
        assert!(RawValue::from("any").is_any_literal());
        assert!(!RawValue::from("Any").is_any_literal());
        assert!(!RawValue::Number(1.0).is_any_literal());
    }
}
