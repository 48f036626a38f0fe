//! Screener filter engine CLI.

use clap::{ColorChoice, Parser};
use screener_cli::commands::{
    filter_document, index_keys, normalize_values, read_request, write_response,
};
use screener_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, Command, FilterArgs, LogFormatArg, LogLevelArg};
use crate::summary::{print_pairs, print_summary};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Filter(args) => match run_filter(&args) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Normalize { values } => {
            print_pairs("Input", "Normalized", &normalize_values(&values));
            0
        }
        Command::IndexKey { names } => {
            print_pairs("Name", "Key", &index_keys(&names));
            0
        }
    };
    std::process::exit(exit_code);
}

/// Transport failures exit non-zero; an `error` response is still a
/// successful run.
fn run_filter(args: &FilterArgs) -> anyhow::Result<()> {
    let input = read_request(&args.request)?;
    let outcome = filter_document(&input);
    write_response(&outcome.response, args.output.as_deref(), args.pretty)?;
    if args.summary {
        print_summary(&outcome);
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
