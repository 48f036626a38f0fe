//! Rule compilation.
//!
//! Each [`Rule`] is classified into a [`RuleKind`] and compiled once per call
//! into a [`Predicate`]. Predicates are plain data; [`Predicate::evaluate`]
//! is the single dispatch point used by the filter pass.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use screener_model::{Condition, FieldValue, FilterOptions, RawValue, Record, Rule};
use screener_normalization::{NormalizedValue, normalize, normalize_field};

use crate::error::PredicateError;
use crate::membership::NormalizedMembership;

/// Shape of a rule, decided in priority order (first match wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// `"any"` value or `any` condition: never excludes a record.
    Wildcard,
    /// Index/group membership of the record's symbol.
    Membership,
    /// Enumerated field compared without normalization.
    Categorical,
    /// `between` with a `[min, max]` pair.
    Range,
    /// Everything else: equality, `over`, `under`, or list membership.
    Scalar,
}

impl RuleKind {
    pub fn classify(rule: &Rule, normalized: &NormalizedValue, options: &FilterOptions) -> Self {
        if is_wildcard(rule, normalized) {
            RuleKind::Wildcard
        } else if options.is_membership(&rule.name) {
            RuleKind::Membership
        } else if options.is_categorical(&rule.name) {
            RuleKind::Categorical
        } else if rule.range_bounds().is_some() {
            RuleKind::Range
        } else {
            RuleKind::Scalar
        }
    }
}

fn is_wildcard(rule: &Rule, normalized: &NormalizedValue) -> bool {
    if rule.condition == Condition::Any || rule.value.is_any_literal() {
        return true;
    }
    match normalized {
        NormalizedValue::List(items) => items.iter().any(NormalizedValue::is_wildcard),
        other => other.is_wildcard(),
    }
}

/// A compiled single-record test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Predicate {
    Always,
    /// Unsatisfiable rule (no membership table, unusable bound).
    Never,
    Membership {
        symbol_field: String,
        members: BTreeSet<String>,
    },
    /// Equality against the field value as stored, no normalization.
    Matches {
        field: String,
        expected: NormalizedValue,
    },
    /// Equality after normalizing the field value.
    Equals {
        field: String,
        expected: NormalizedValue,
    },
    /// Field value, verbatim or normalized, appears in the list.
    /// An empty `normalized` list disables the normalized comparison.
    OneOf {
        field: String,
        verbatim: Vec<NormalizedValue>,
        normalized: Vec<NormalizedValue>,
    },
    /// Exclusive on both ends; `None` is unbounded.
    Range {
        field: String,
        min: Option<f64>,
        max: Option<f64>,
    },
    Over {
        field: String,
        threshold: f64,
    },
    /// Inclusive of the threshold, unlike [`Predicate::Over`].
    Under {
        field: String,
        threshold: f64,
    },
}

impl Predicate {
    pub fn kind(&self) -> &'static str {
        match self {
            Predicate::Always => "always",
            Predicate::Never => "never",
            Predicate::Membership { .. } => "membership",
            Predicate::Matches { .. } => "matches",
            Predicate::Equals { .. } => "equals",
            Predicate::OneOf { .. } => "oneOf",
            Predicate::Range { .. } => "range",
            Predicate::Over { .. } => "over",
            Predicate::Under { .. } => "under",
        }
    }

    /// Test one record. Absent fields are a plain non-match; type mismatches
    /// are reported as [`PredicateError`].
    pub fn evaluate(&self, record: &Record) -> Result<bool, PredicateError> {
        match self {
            Predicate::Always => Ok(true),
            Predicate::Never => Ok(false),
            Predicate::Membership {
                symbol_field,
                members,
            } => Ok(record
                .symbol(symbol_field)
                .is_some_and(|symbol| members.contains(&symbol))),
            Predicate::Matches { field, expected } => match record.field(field) {
                FieldValue::Absent => Ok(false),
                value => Ok(verbatim_field(value) == *expected),
            },
            Predicate::Equals { field, expected } => {
                Ok(scalar_field(record, field)?.is_some_and(|value| value == *expected))
            }
            Predicate::OneOf {
                field,
                verbatim,
                normalized,
            } => {
                let value = record.field(field);
                if value.is_absent() {
                    return Ok(false);
                }
                if verbatim.contains(&verbatim_field(value)) {
                    return Ok(true);
                }
                Ok(!normalized.is_empty() && normalized.contains(&normalize_field(value)))
            }
            Predicate::Range { field, min, max } => {
                let Some(value) = numeric_field(record, field)? else {
                    return Ok(false);
                };
                Ok(min.is_none_or(|min| value > min) && max.is_none_or(|max| value < max))
            }
            Predicate::Over { field, threshold } => {
                Ok(numeric_field(record, field)?.is_some_and(|value| value > *threshold))
            }
            Predicate::Under { field, threshold } => {
                Ok(numeric_field(record, field)?.is_some_and(|value| value <= *threshold))
            }
        }
    }
}

/// Normalized scalar field value; `None` when absent.
fn scalar_field(record: &Record, field: &str) -> Result<Option<NormalizedValue>, PredicateError> {
    match record.field(field) {
        FieldValue::Absent => Ok(None),
        FieldValue::Unsupported(_) => Err(PredicateError::UnsupportedField {
            field: field.to_string(),
        }),
        value => Ok(Some(normalize_field(value))),
    }
}

fn numeric_field(record: &Record, field: &str) -> Result<Option<f64>, PredicateError> {
    match scalar_field(record, field)? {
        None => Ok(None),
        Some(NormalizedValue::Number(value)) => Ok(Some(value)),
        Some(other) => Err(PredicateError::NotNumeric {
            field: field.to_string(),
            value: other.to_string(),
        }),
    }
}

fn verbatim_field(value: FieldValue<'_>) -> NormalizedValue {
    match value {
        FieldValue::Number(n) => NormalizedValue::Number(n),
        FieldValue::Text(text) => NormalizedValue::Text(text.to_string()),
        FieldValue::Absent => NormalizedValue::Null,
        FieldValue::Unsupported(_) => verbatim(&value.to_raw()),
    }
}

/// Rule value as authored, without normalization.
fn verbatim(raw: &RawValue) -> NormalizedValue {
    match raw {
        RawValue::Null => NormalizedValue::Null,
        RawValue::Bool(flag) => NormalizedValue::Bool(*flag),
        RawValue::Number(n) => NormalizedValue::Number(*n),
        RawValue::Text(text) => NormalizedValue::Text(text.clone()),
        RawValue::List(items) => NormalizedValue::List(items.iter().map(verbatim).collect()),
    }
}

/// A rule paired with its compiled predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledRule {
    pub rule: Rule,
    pub predicate: Predicate,
}

impl CompiledRule {
    pub fn matches(&self, record: &Record) -> Result<bool, PredicateError> {
        self.predicate.evaluate(record)
    }
}

/// Compile one rule.
///
/// `membership` is the per-call normalized table; `None` or an empty table
/// makes membership rules fail closed.
pub fn compile(
    rule: &Rule,
    membership: Option<&NormalizedMembership>,
    options: &FilterOptions,
) -> CompiledRule {
    let normalized = normalize(&rule.value);
    let kind = RuleKind::classify(rule, &normalized, options);
    let predicate = match kind {
        RuleKind::Wildcard => Predicate::Always,
        RuleKind::Membership => compile_membership(rule, membership, options),
        RuleKind::Categorical => compile_categorical(rule),
        RuleKind::Range => compile_range(rule),
        RuleKind::Scalar => compile_scalar(rule, normalized),
    };
    debug!(
        rule = %rule.name,
        condition = %rule.condition,
        kind = ?kind,
        predicate = predicate.kind(),
        "compiled rule"
    );
    CompiledRule {
        rule: rule.clone(),
        predicate,
    }
}

fn compile_membership(
    rule: &Rule,
    membership: Option<&NormalizedMembership>,
    options: &FilterOptions,
) -> Predicate {
    let Some(membership) = membership.filter(|table| !table.is_empty()) else {
        debug!(rule = %rule.name, "no membership table supplied, rule matches nothing");
        return Predicate::Never;
    };
    let requested = requested_groups(&rule.value);
    let members = membership.union_of(requested.iter().map(String::as_str));
    if members.is_empty() {
        debug!(rule = %rule.name, groups = ?requested, "requested groups have no members");
    }
    Predicate::Membership {
        symbol_field: options.symbol_field.clone(),
        members,
    }
}

fn requested_groups(value: &RawValue) -> Vec<String> {
    match value {
        RawValue::Text(text) => vec![text.clone()],
        RawValue::Number(n) => vec![n.to_string()],
        RawValue::List(items) => items.iter().flat_map(requested_groups).collect(),
        RawValue::Null | RawValue::Bool(_) => Vec::new(),
    }
}

fn compile_categorical(rule: &Rule) -> Predicate {
    match &rule.value {
        RawValue::Null => missing_value(rule),
        RawValue::List(items) => Predicate::OneOf {
            field: rule.name.clone(),
            verbatim: items.iter().map(verbatim).collect(),
            normalized: Vec::new(),
        },
        value => Predicate::Matches {
            field: rule.name.clone(),
            expected: verbatim(value),
        },
    }
}

fn compile_range(rule: &Rule) -> Predicate {
    let Some((min, max)) = rule.range_bounds() else {
        return compile_scalar(rule, normalize(&rule.value));
    };
    match (range_bound(&normalize(min)), range_bound(&normalize(max))) {
        (Ok(None), Ok(None)) => Predicate::Always,
        (Ok(min), Ok(max)) => Predicate::Range {
            field: rule.name.clone(),
            min,
            max,
        },
        _ => {
            warn!(
                rule = %rule.name,
                min = %min,
                max = %max,
                "non-numeric range bound, rule matches nothing"
            );
            Predicate::Never
        }
    }
}

/// `Ok(None)` for an empty bound, `Err` for one that is present but not numeric.
fn range_bound(bound: &NormalizedValue) -> Result<Option<f64>, ()> {
    if bound.is_unbounded() {
        return Ok(None);
    }
    bound.as_f64().map(Some).ok_or(())
}

fn compile_scalar(rule: &Rule, normalized: NormalizedValue) -> Predicate {
    let field = rule.name.clone();
    if let (RawValue::List(raw_items), NormalizedValue::List(items)) = (&rule.value, &normalized) {
        return Predicate::OneOf {
            field,
            verbatim: raw_items.iter().map(verbatim).collect(),
            normalized: items.clone(),
        };
    }
    if normalized == NormalizedValue::Null {
        return missing_value(rule);
    }
    match rule.condition {
        Condition::Over => match normalized.as_f64() {
            Some(threshold) => Predicate::Over { field, threshold },
            None => unusable_threshold(rule),
        },
        Condition::Under => match normalized.as_f64() {
            Some(threshold) => Predicate::Under { field, threshold },
            None => unusable_threshold(rule),
        },
        Condition::Exactly
        | Condition::Between
        | Condition::Membership
        | Condition::Any
        | Condition::Unspecified => Predicate::Equals {
            field,
            expected: normalized,
        },
    }
}

/// A rule without a comparison value constrains nothing only when its
/// condition is unrecognized; a recognized comparison against nothing fails.
fn missing_value(rule: &Rule) -> Predicate {
    if rule.condition == Condition::Unspecified {
        return Predicate::Always;
    }
    warn!(
        rule = %rule.name,
        condition = %rule.condition,
        "comparison value missing, rule matches nothing"
    );
    Predicate::Never
}

fn unusable_threshold(rule: &Rule) -> Predicate {
    warn!(
        rule = %rule.name,
        condition = %rule.condition,
        value = %rule.value,
        "non-numeric comparison value, rule matches nothing"
    );
    Predicate::Never
}
