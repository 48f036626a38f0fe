//! Request and response types exchanged with the filter engine.

use serde::{Deserialize, Deserializer, Serialize};

use crate::membership::MembershipTable;
use crate::options::FilterOptions;
use crate::record::Record;
use crate::rule::{Condition, Rule};

/// One filter invocation as delivered by the caller.
///
/// Missing or `null` `records` and `rules` deserialize as empty, which the
/// engine treats as "nothing to filter".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub records: Vec<Record>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rules: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_table: Option<MembershipTable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<FilterOptions>,
}

impl FilterRequest {
    pub fn new(records: Vec<Record>, rules: Vec<Rule>) -> Self {
        Self {
            records,
            rules,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_membership_table(mut self, table: MembershipTable) -> Self {
        self.membership_table = Some(table);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: FilterOptions) -> Self {
        self.options = Some(options);
        self
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Per-rule outcome of a filter pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleStats {
    pub rule_name: String,
    pub condition: Condition,
    /// Records this rule was the first to reject.
    pub rejected: usize,
    /// Records whose evaluation faulted and were counted as rejected.
    pub faults: usize,
}

/// Output of the filter pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResult {
    /// Surviving records in input order.
    pub filtered_records: Vec<Record>,
    pub original_count: usize,
    pub filtered_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_stats: Vec<RuleStats>,
}

impl FilterResult {
    /// Identity result: every record passes.
    pub fn unfiltered(records: Vec<Record>) -> Self {
        let count = records.len();
        Self {
            filtered_records: records,
            original_count: count,
            filtered_count: count,
            rule_stats: Vec::new(),
        }
    }

    pub fn rejected_count(&self) -> usize {
        self.original_count - self.filtered_count
    }

    pub fn fault_count(&self) -> usize {
        self.rule_stats.iter().map(|stats| stats.faults).sum()
    }
}

/// Reply sent back across the engine boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "status",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum FilterResponse {
    Success {
        filtered_records: Vec<Record>,
        original_count: usize,
        filtered_count: usize,
    },
    /// The pass failed as a whole; the caller keeps showing `original_records`.
    Error {
        original_records: Vec<Record>,
        error_message: String,
    },
}

impl FilterResponse {
    pub fn error(original_records: Vec<Record>, message: impl Into<String>) -> Self {
        FilterResponse::Error {
            original_records,
            error_message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FilterResponse::Success { .. })
    }

    /// Records the caller should display: filtered on success, original on error.
    pub fn records(&self) -> &[Record] {
        match self {
            FilterResponse::Success {
                filtered_records, ..
            } => filtered_records,
            FilterResponse::Error {
                original_records, ..
            } => original_records,
        }
    }
}

impl From<FilterResult> for FilterResponse {
    fn from(result: FilterResult) -> Self {
        FilterResponse::Success {
            filtered_records: result.filtered_records,
            original_count: result.original_count,
            filtered_count: result.filtered_count,
        }
    }
}
