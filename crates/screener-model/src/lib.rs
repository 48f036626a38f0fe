pub mod error;
pub mod membership;
pub mod options;
pub mod processing;
pub mod record;
pub mod rule;
pub mod value;

pub use error::{Result, ScreenerError};
pub use membership::MembershipTable;
pub use options::FilterOptions;
pub use processing::{FilterRequest, FilterResponse, FilterResult, RuleStats};
pub use record::{FieldValue, Record};
pub use rule::{Condition, Rule};
pub use value::RawValue;
