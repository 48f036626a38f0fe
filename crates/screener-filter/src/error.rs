use thiserror::Error;

/// Fault raised while evaluating one predicate against one record.
///
/// The filter pass absorbs these: the record is counted as not matching the
/// rule and the batch continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredicateError {
    #[error("field `{field}` is not numeric: {value}")]
    NotNumeric { field: String, value: String },
    #[error("field `{field}` holds an unsupported value type")]
    UnsupportedField { field: String },
}
