//! CLI argument definitions for the screener filter engine.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "screener",
    version,
    about = "Filter instrument records with screener rules",
    long_about = "Filter instrument records with screener rules.\n\n\
                  Reads a JSON request ({records, rules, membershipTable?, options?}) \
                  and writes a JSON response ({status: success|error, ...})."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a filter request and print the response.
    Filter(FilterArgs),

    /// Print the normalized form of each value.
    Normalize {
        /// Values such as 1.5B, 12%, -5K.
        #[arg(value_name = "VALUE", required = true)]
        values: Vec<String>,
    },

    /// Print the canonical lookup key of each index name.
    IndexKey {
        /// Index names such as "S&P 500".
        #[arg(value_name = "NAME", required = true)]
        names: Vec<String>,
    },
}

#[derive(Parser)]
pub struct FilterArgs {
    /// Request JSON file, or `-` for stdin.
    #[arg(value_name = "REQUEST")]
    pub request: PathBuf,

    /// Write the response to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Pretty-print the response JSON.
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Print a per-rule summary table to stderr.
    #[arg(long = "summary")]
    pub summary: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
