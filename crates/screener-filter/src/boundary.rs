//! Request/response boundary of the filter engine.
//!
//! Every call produces a [`FilterResponse`]. A batch-level failure (a
//! malformed request or a panic inside the pass) becomes the `error` variant
//! carrying the original records, so the caller can keep showing them.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde_json::Value;
use tracing::{error, warn};

use screener_model::{FilterRequest, FilterResponse, FilterResult, Record, ScreenerError};

use crate::engine::run_filter;

/// Run the filter pass for one request.
pub fn handle_request(request: FilterRequest) -> FilterResponse {
    run_request(request).map_or_else(|response| response, FilterResponse::from)
}

/// Parse a JSON request and run it.
pub fn handle_json(input: &str) -> FilterResponse {
    match parse_request(input) {
        Ok(request) => handle_request(request),
        Err(response) => response,
    }
}

/// Run the filter pass, keeping the full [`FilterResult`] (including per-rule
/// statistics) on success. A panic inside the pass becomes the `error`
/// response.
pub fn run_request(request: FilterRequest) -> Result<FilterResult, FilterResponse> {
    let FilterRequest {
        records,
        rules,
        membership_table,
        options,
    } = request;
    let options = options.unwrap_or_default();

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        run_filter(&records, &rules, membership_table.as_ref(), &options)
    }));
    outcome.map_err(|payload| {
        let message = panic_message(payload.as_ref());
        error!(error = %message, records = records.len(), "filter pass aborted");
        FilterResponse::error(records, message)
    })
}

/// Parse a JSON request document.
///
/// On failure the `records` array is still salvaged from the raw document
/// where possible and returned inside the `error` response.
pub fn parse_request(input: &str) -> Result<FilterRequest, FilterResponse> {
    serde_json::from_str::<FilterRequest>(input).map_err(|parse_error| {
        let error = ScreenerError::from(parse_error);
        let records = salvage_records(input);
        warn!(%error, salvaged = records.len(), "rejecting malformed filter request");
        FilterResponse::error(records, error.to_string())
    })
}

/// Best-effort extraction of `records` from a request that failed to parse.
fn salvage_records(input: &str) -> Vec<Record> {
    let Ok(Value::Object(mut document)) = serde_json::from_str::<Value>(input) else {
        return Vec::new();
    };
    let Some(Value::Array(items)) = document.remove("records") else {
        return Vec::new();
    };
    items.into_iter().map(Record::from).collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("internal error: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("internal error: {message}")
    } else {
        "internal error during filter pass".to_string()
    }
}
