//! CLI library components for the screener filter engine.

pub mod commands;
pub mod logging;
