use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Group name (e.g. a stock index) to member symbols, as supplied by the caller.
///
/// Keys and symbols are kept verbatim; lookups go through a normalized copy
/// built per filter call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipTable(BTreeMap<String, Vec<String>>);

impl MembershipTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, S>(&mut self, group: impl Into<String>, members: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(group.into())
            .or_default()
            .extend(members.into_iter().map(Into::into));
    }

    #[must_use]
    pub fn with_group<I, S>(mut self, group: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(group, members);
        self
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(group, members)| (group.as_str(), members.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
