//! Rule-based filtering of instrument records.
//!
//! Rules are compiled once per call into [`Predicate`]s and applied
//! conjunctively to every record. Per-record evaluation faults reject the
//! record for that rule and never abort the batch.

pub mod boundary;
pub mod compile;
pub mod engine;
pub mod error;
pub mod membership;
pub mod worker;

pub use boundary::{handle_json, handle_request, parse_request, run_request};
pub use compile::{CompiledRule, Predicate, RuleKind, compile};
pub use engine::{FilterPass, run_filter};
pub use error::PredicateError;
pub use membership::NormalizedMembership;
pub use worker::{FilterWorker, WorkerReply};
