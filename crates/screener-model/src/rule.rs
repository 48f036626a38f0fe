//! User-authored filter rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::RawValue;

/// Comparison requested by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Exactly,
    Over,
    Under,
    Between,
    Membership,
    Any,
    /// Missing or unrecognized condition: equality when a value is given,
    /// otherwise always satisfied.
    #[default]
    #[serde(other)]
    Unspecified,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Exactly => "exactly",
            Condition::Over => "over",
            Condition::Under => "under",
            Condition::Between => "between",
            Condition::Membership => "membership",
            Condition::Any => "any",
            Condition::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Condition {
    type Err = String;

    /// Parse a condition keyword (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exactly" => Ok(Condition::Exactly),
            "over" => Ok(Condition::Over),
            "under" => Ok(Condition::Under),
            "between" => Ok(Condition::Between),
            "membership" => Ok(Condition::Membership),
            "any" => Ok(Condition::Any),
            _ => Err(format!("Unknown rule condition: {s}")),
        }
    }
}

/// A single filter condition over one record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Record field the rule reads.
    pub name: String,
    #[serde(default)]
    pub condition: Condition,
    /// Scalar, `[min, max]` pair, or list of accepted keys.
    #[serde(default)]
    pub value: RawValue,
}

impl Rule {
    pub fn new(name: impl Into<String>, condition: Condition, value: impl Into<RawValue>) -> Self {
        Self {
            name: name.into(),
            condition,
            value: value.into(),
        }
    }

    /// `[min, max]` bounds when the rule is a well-formed range.
    pub fn range_bounds(&self) -> Option<(&RawValue, &RawValue)> {
        if self.condition != Condition::Between {
            return None;
        }
        match self.value.as_list() {
            Some([min, max]) => Some((min, max)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_deserializes_unknown_as_unspecified() {
        let rule: Rule =
            serde_json::from_str(r#"{"name":"premium","condition":"atLeast","value":"5"}"#)
                .expect("parse rule");
        assert_eq!(rule.condition, Condition::Unspecified);

        let rule: Rule = serde_json::from_str(r#"{"name":"premium"}"#).expect("parse rule");
        assert_eq!(rule.condition, Condition::Unspecified);
        assert!(rule.value.is_null());
    }

    #[test]
    fn condition_from_str() {
        assert_eq!("Between".parse::<Condition>().unwrap(), Condition::Between);
        assert_eq!(" over ".parse::<Condition>().unwrap(), Condition::Over);
        assert!("sideways".parse::<Condition>().is_err());
    }

    #[test]
    fn range_bounds_need_two_elements() {
        let rule = Rule::new("premium", Condition::Between, vec!["10", "20"]);
        assert!(rule.range_bounds().is_some());

        let rule = Rule::new("premium", Condition::Between, vec!["10"]);
        assert!(rule.range_bounds().is_none());

        let rule = Rule::new("premium", Condition::Over, vec!["10", "20"]);
        assert!(rule.range_bounds().is_none());
    }
}
