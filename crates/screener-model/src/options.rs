//! Configuration options for rule compilation.

use serde::{Deserialize, Serialize};

/// Field-name classification used by the rule compiler.
///
/// All comparisons against these names are ASCII case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterOptions {
    /// Enumerated-type fields compared by equality or set membership,
    /// without value normalization.
    pub categorical_fields: Vec<String>,

    /// Rule names that request index/group membership of the record's symbol.
    pub membership_fields: Vec<String>,

    /// Record field holding the instrument symbol.
    pub symbol_field: String,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            categorical_fields: vec!["optionType".to_string(), "assetType".to_string()],
            membership_fields: vec!["indexMembership".to_string()],
            symbol_field: "symbol".to_string(),
        }
    }
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_categorical_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_membership_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.membership_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_symbol_field(mut self, field: impl Into<String>) -> Self {
        self.symbol_field = field.into();
        self
    }

    pub fn is_categorical(&self, name: &str) -> bool {
        self.categorical_fields
            .iter()
            .any(|field| field.eq_ignore_ascii_case(name))
    }

    pub fn is_membership(&self, name: &str) -> bool {
        self.membership_fields
            .iter()
            .any(|field| field.eq_ignore_ascii_case(name))
    }
}
