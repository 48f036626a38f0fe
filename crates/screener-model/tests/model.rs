//! Tests for screener-model wire types.

use screener_model::{
    Condition, FilterRequest, FilterResponse, FilterResult, MembershipTable, RawValue, Record,
    Rule,
};

fn record(symbol: &str, premium: i64) -> Record {
    Record::new()
        .with("symbol", symbol)
        .with("premium", premium)
}

#[test]
fn request_parses_full_message() {
    let json = r#"{
        "records": [{"symbol": "AAPL", "premium": 500000}],
        "rules": [
            {"name": "premium", "condition": "between", "value": ["", "1.5B"]},
            {"name": "indexMembership", "condition": "membership", "value": ["S&P 500"]}
        ],
        "membershipTable": {"SP500": ["AAPL", "MSFT"]}
    }"#;
    let request: FilterRequest = serde_json::from_str(json).expect("parse request");
    assert_eq!(request.records.len(), 1);
    assert_eq!(request.rules[0].condition, Condition::Between);
    assert_eq!(
        request.rules[0].value,
        RawValue::List(vec![RawValue::from(""), RawValue::from("1.5B")])
    );
    let table = request.membership_table.expect("membership table");
    assert_eq!(table.len(), 1);
}

#[test]
fn request_treats_null_sections_as_empty() {
    let request: FilterRequest =
        serde_json::from_str(r#"{"records": null, "rules": null}"#).expect("parse request");
    assert!(request.records.is_empty());
    assert!(request.rules.is_empty());
}

#[test]
fn request_keeps_non_object_records() {
    let request: FilterRequest =
        serde_json::from_str(r#"{"records": [{"symbol": "AAPL"}, 7, null]}"#)
            .expect("parse request");
    assert_eq!(request.records.len(), 3);
    assert!(request.records[0].is_object());
    assert!(!request.records[1].is_object());
    assert!(request.records[2].field("symbol").is_absent());
}

#[test]
fn success_response_snapshot() {
    let result = FilterResult {
        filtered_records: vec![record("AAPL", 500_000)],
        original_count: 2,
        filtered_count: 1,
        rule_stats: vec![],
    };
    insta::assert_json_snapshot!(FilterResponse::from(result), @r#"
    {
      "status": "success",
      "filteredRecords": [
        {
          "premium": 500000,
          "symbol": "AAPL"
        }
      ],
      "originalCount": 2,
      "filteredCount": 1
    }
    "#);
}

#[test]
fn error_response_snapshot() {
    let response = FilterResponse::error(vec![record("TSLA", 50)], "boom");
    insta::assert_json_snapshot!(response, @r#"
    {
      "status": "error",
      "originalRecords": [
        {
          "premium": 50,
          "symbol": "TSLA"
        }
      ],
      "errorMessage": "boom"
    }
    "#);
}

#[test]
fn response_round_trips_through_json() {
    let response = FilterResponse::error(vec![record("TSLA", 50)], "boom");
    let json = serde_json::to_string(&response).expect("serialize response");
    let round: FilterResponse = serde_json::from_str(&json).expect("deserialize response");
    assert_eq!(round, response);
    assert_eq!(round.records().len(), 1);
    assert!(!round.is_success());
}

#[test]
fn unfiltered_result_keeps_counts_equal() {
    let result = FilterResult::unfiltered(vec![record("A", 1), record("B", 2)]);
    assert_eq!(result.original_count, 2);
    assert_eq!(result.filtered_count, 2);
    assert_eq!(result.rejected_count(), 0);
    assert_eq!(result.fault_count(), 0);
}

#[test]
fn membership_table_merges_repeated_groups() {
    let mut table = MembershipTable::new();
    table.insert("S&P 500", ["AAPL"]);
    table.insert("S&P 500", ["MSFT"]);
    let groups: Vec<_> = table.groups().collect();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].1, ["AAPL".to_string(), "MSFT".to_string()]);
}

#[test]
fn rule_builder_accepts_lists() {
    let rule = Rule::new("optionType", Condition::Exactly, vec!["call", "put"]);
    assert_eq!(rule.value.as_list().map(<[RawValue]>::len), Some(2));
}
