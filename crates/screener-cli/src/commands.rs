use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use screener_filter::{parse_request, run_request};
use screener_model::{FilterResponse, RuleStats};
use screener_normalization::{NormalizedValue, normalize_key, normalize_str};

/// Response plus the per-rule statistics that stay off the wire.
#[derive(Debug)]
pub struct FilterOutcome {
    pub response: FilterResponse,
    pub rule_stats: Vec<RuleStats>,
}

impl FilterOutcome {
    pub fn original_count(&self) -> usize {
        match &self.response {
            FilterResponse::Success { original_count, .. } => *original_count,
            FilterResponse::Error {
                original_records, ..
            } => original_records.len(),
        }
    }
}

/// Run one JSON request document through the engine.
pub fn filter_document(input: &str) -> FilterOutcome {
    let span = info_span!("filter_document", bytes = input.len());
    let _guard = span.enter();
    let outcome = parse_request(input).and_then(run_request);
    match outcome {
        Ok(result) => {
            let rule_stats = result.rule_stats.clone();
            FilterOutcome {
                response: FilterResponse::from(result),
                rule_stats,
            }
        }
        Err(response) => FilterOutcome {
            response,
            rule_stats: Vec::new(),
        },
    }
}

/// Read a request from a file, or from stdin when the path is `-`.
pub fn read_request(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("read request from stdin")?;
        return Ok(input);
    }
    fs::read_to_string(path).with_context(|| format!("read request {}", path.display()))
}

pub fn render_response(response: &FilterResponse, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    };
    rendered.context("serialize response")
}

/// Write the response to `output`, or stdout when `None`.
pub fn write_response(
    response: &FilterResponse,
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let rendered = render_response(response, pretty)?;
    match output {
        Some(path) => {
            fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("write response {}", path.display()))?;
            info!(path = %path.display(), "response written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{rendered}").context("write response to stdout")?;
        }
    }
    Ok(())
}

pub fn normalize_values(values: &[String]) -> Vec<(String, NormalizedValue)> {
    values
        .iter()
        .map(|value| (value.clone(), normalize_str(value)))
        .collect()
}

pub fn index_keys(names: &[String]) -> Vec<(String, String)> {
    names
        .iter()
        .map(|name| (name.clone(), normalize_key(name)))
        .collect()
}
