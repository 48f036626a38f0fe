//! Per-call normalized copy of the caller's membership table.

use std::collections::{BTreeSet, HashMap};

use screener_model::MembershipTable;
use screener_normalization::normalize_key;

/// Group keys canonicalized with [`normalize_key`], members upper-cased.
///
/// Groups whose names collide after normalization are merged.
#[derive(Debug, Clone, Default)]
pub struct NormalizedMembership {
    groups: HashMap<String, BTreeSet<String>>,
}

impl NormalizedMembership {
    pub fn new(table: &MembershipTable) -> Self {
        let mut groups: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (group, members) in table.groups() {
            let key = normalize_key(group);
            let entry = groups.entry(key).or_default();
            for member in members {
                let symbol = member.trim();
                if !symbol.is_empty() {
                    entry.insert(symbol.to_uppercase());
                }
            }
        }
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Members of the group named `raw_group` (any spelling variant).
    pub fn members(&self, raw_group: &str) -> Option<&BTreeSet<String>> {
        self.groups.get(&normalize_key(raw_group))
    }

    /// Union of the members of every requested group. Unknown groups add nothing.
    pub fn union_of<'a, I>(&self, requested: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut union = BTreeSet::new();
        for group in requested {
            if let Some(members) = self.members(group) {
                union.extend(members.iter().cloned());
            }
        }
        union
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spelling_variants_share_one_bucket() {
        let table = MembershipTable::new()
            .with_group("S&P 100", ["aapl", " msft "])
            .with_group("s and p 100", ["GOOG", ""]);
        let normalized = NormalizedMembership::new(&table);
        let members = normalized.members("s&p100").expect("bucket");
        assert_eq!(
            members.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["AAPL", "GOOG", "MSFT"]
        );
    }

    #[test]
    fn union_skips_unknown_groups() {
        let table = MembershipTable::new()
            .with_group("SP500", ["AAPL"])
            .with_group("Nasdaq 100", ["TSLA"]);
        let normalized = NormalizedMembership::new(&table);
        let union = normalized.union_of(["S&P 500", "NASDAQ-100", "Russell 2000"]);
        assert_eq!(union.len(), 2);
        assert!(union.contains("TSLA"));
    }

    #[test]
    fn empty_table_is_empty() {
        assert!(NormalizedMembership::new(&MembershipTable::new()).is_empty());
    }
}
