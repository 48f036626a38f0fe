//! Conjunctive filter pass over a record batch.

use std::time::Instant;

use tracing::{debug, info, info_span};

use screener_model::{FilterOptions, FilterResult, MembershipTable, Record, Rule, RuleStats};

use crate::compile::{CompiledRule, compile};
use crate::membership::NormalizedMembership;

/// A rule set compiled for one filter call.
#[derive(Debug, Clone, Default)]
pub struct FilterPass {
    rules: Vec<CompiledRule>,
}

impl FilterPass {
    /// Compile every rule once. The membership table is normalized here and
    /// dropped with the pass.
    pub fn compile(
        rules: &[Rule],
        membership_table: Option<&MembershipTable>,
        options: &FilterOptions,
    ) -> Self {
        let membership = membership_table.map(NormalizedMembership::new);
        let rules = rules
            .iter()
            .map(|rule| compile(rule, membership.as_ref(), options))
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// True when every rule accepts the record. Faults count as rejection.
    pub fn matches(&self, record: &Record) -> bool {
        self.first_rejection(record).is_none()
    }

    /// Index of the first rule rejecting the record, and whether it faulted.
    fn first_rejection(&self, record: &Record) -> Option<(usize, bool)> {
        for (idx, compiled) in self.rules.iter().enumerate() {
            match compiled.matches(record) {
                Ok(true) => {}
                Ok(false) => return Some((idx, false)),
                Err(error) => {
                    debug!(rule = %compiled.rule.name, %error, "predicate fault, record rejected");
                    return Some((idx, true));
                }
            }
        }
        None
    }

    /// Keep the records accepted by every rule, in input order.
    pub fn apply(&self, records: &[Record]) -> FilterResult {
        let mut stats: Vec<RuleStats> = self
            .rules
            .iter()
            .map(|compiled| RuleStats {
                rule_name: compiled.rule.name.clone(),
                condition: compiled.rule.condition,
                rejected: 0,
                faults: 0,
            })
            .collect();

        let mut filtered_records = Vec::new();
        for record in records {
            match self.first_rejection(record) {
                None => filtered_records.push(record.clone()),
                Some((idx, faulted)) => {
                    stats[idx].rejected += 1;
                    if faulted {
                        stats[idx].faults += 1;
                    }
                }
            }
        }

        FilterResult {
            original_count: records.len(),
            filtered_count: filtered_records.len(),
            filtered_records,
            rule_stats: stats,
        }
    }
}

/// Filter `records` by `rules` (logical AND).
///
/// Empty `records` or empty `rules` return the input unchanged.
pub fn run_filter(
    records: &[Record],
    rules: &[Rule],
    membership_table: Option<&MembershipTable>,
    options: &FilterOptions,
) -> FilterResult {
    if records.is_empty() || rules.is_empty() {
        debug!(
            records = records.len(),
            rules = rules.len(),
            "nothing to filter, returning input unchanged"
        );
        return FilterResult::unfiltered(records.to_vec());
    }

    let span = info_span!("filter_pass", records = records.len(), rules = rules.len());
    let _guard = span.enter();
    let start = Instant::now();

    let pass = FilterPass::compile(rules, membership_table, options);
    let result = pass.apply(records);

    info!(
        original_count = result.original_count,
        filtered_count = result.filtered_count,
        faults = result.fault_count(),
        duration_ms = start.elapsed().as_millis(),
        "filter pass complete"
    );
    for stats in result.rule_stats.iter().filter(|stats| stats.rejected > 0) {
        debug!(
            rule = %stats.rule_name,
            condition = %stats.condition,
            rejected = stats.rejected,
            faults = stats.faults,
            "rule rejections"
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use screener_model::Condition;

    fn record(symbol: &str, premium: i64) -> Record {
        Record::new()
            .with("symbol", symbol)
            .with("assetType", "stock")
            .with("premium", premium)
    }

    #[test]
    fn empty_rules_is_identity() {
        let records = vec![record("A", 1), record("B", 2)];
        let result = run_filter(&records, &[], None, &FilterOptions::default());
        assert_eq!(result.filtered_records, records);
        assert_eq!(result.filtered_count, result.original_count);
    }

    #[test]
    fn empty_records_stay_empty() {
        let rules = vec![Rule::new("premium", Condition::Over, 1)];
        let result = run_filter(&[], &rules, None, &FilterOptions::default());
        assert!(result.filtered_records.is_empty());
        assert_eq!(result.original_count, 0);
    }

    #[test]
    fn stats_attribute_first_rejecting_rule() {
        let records = vec![
            record("A", 50),
            record("B", 500),
            Record::new().with("symbol", "C").with("premium", "n/a"),
        ];
        let rules = vec![
            Rule::new("premium", Condition::Over, 100),
            Rule::new("assetType", Condition::Exactly, "stock"),
        ];
        let result = run_filter(&records, &rules, None, &FilterOptions::default());
        assert_eq!(result.filtered_count, 1);
        assert_eq!(result.rule_stats[0].rejected, 2);
        assert_eq!(result.rule_stats[0].faults, 1);
        assert_eq!(result.rule_stats[1].rejected, 0);
        assert_eq!(result.fault_count(), 1);
    }

    #[test]
    fn pass_matches_single_records() {
        let rules = vec![Rule::new("premium", Condition::Under, "1K")];
        let pass = FilterPass::compile(&rules, None, &FilterOptions::default());
        assert_eq!(pass.rules().len(), 1);
        assert!(pass.matches(&record("A", 1_000)));
        assert!(!pass.matches(&record("A", 1_001)));
    }
}
