//! Unit tests for settings validation and parsing.

use memetrix::config::{parse_interval_secs, LlmEndpoint, Settings};

#[test]
fn defaults_validate() {
    assert!(Settings::default().validate().is_ok());
}

#[test]
fn cut_points_must_ascend() {
    let mut settings = Settings::default();
    settings.scoring.watch = 90.0; // above monitor
    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("scoring"));

    let mut settings = Settings::default();
    settings.scoring.monitor = settings.scoring.trade_candidate;
    assert!(settings.validate().is_err());
}

#[test]
fn entry_window_must_be_ordered() {
    let mut settings = Settings::default();
    settings.trade_plan.entry_mcap_min = 30_000.0;
    settings.trade_plan.entry_mcap_max = 20_000.0;
    assert!(settings.validate().is_err());
}

#[test]
fn multipliers_are_bounded() {
    let mut settings = Settings::default();
    settings.trade_plan.target_multiplier = 0.9;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.trade_plan.stop_multiplier = 1.2;
    assert!(settings.validate().is_err());
}

#[test]
fn percentages_are_bounded() {
    let mut settings = Settings::default();
    settings.healthy.holders.max_dev_hold_perc = 150.0;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.rsi.entry_rsi_max = -3.0;
    assert!(settings.validate().is_err());
}

#[test]
fn llm_endpoints_are_checked() {
    let endpoint = |base_url: &str, max_concurrency: usize| LlmEndpoint {
        name: "w".to_string(),
        base_url: base_url.to_string(),
        api_key: String::new(),
        model: "m".to_string(),
        max_concurrency,
        timeout_ms: 1_000,
    };

    let mut settings = Settings::default();
    settings.llm.endpoints = vec![endpoint("not a url", 1)];
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.llm.endpoints = vec![endpoint("http://127.0.0.1:1234", 0)];
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.llm.endpoints = vec![endpoint("http://127.0.0.1:1234", 2)];
    assert!(settings.validate().is_ok());
}

#[test]
fn worker_key_normalizes_trailing_slash() {
    let mut endpoint = LlmEndpoint::default();
    endpoint.base_url = "http://127.0.0.1:1234/".to_string();
    endpoint.model = "m".to_string();
    assert_eq!(endpoint.worker_key(), "http://127.0.0.1:1234||m");
}

#[test]
fn interval_parsing() {
    assert_eq!(parse_interval_secs("5s"), 5);
    assert_eq!(parse_interval_secs("1m"), 60);
    assert_eq!(parse_interval_secs("15m"), 900);
    // Malformed intervals fall back to one minute.
    assert_eq!(parse_interval_secs("junk"), 60);
    assert_eq!(parse_interval_secs(""), 60);
    assert_eq!(parse_interval_secs("0s"), 60);
}

#[test]
fn settings_document_round_trips_in_camel_case() {
    let settings = Settings::default();
    let doc = serde_json::to_value(&settings).unwrap();

    assert!(doc.get("tradePlan").is_some());
    assert!(doc["healthy"].get("minLiquidityUsd").is_some());
    assert!(doc["app"].get("configVersion").is_some());

    let parsed: Settings = serde_json::from_value(doc).unwrap();
    assert!(parsed.validate().is_ok());
    assert_eq!(parsed.scoring.trade_candidate, 85.0);
}

#[test]
fn partial_documents_fill_with_defaults() {
    let parsed: Settings =
        serde_json::from_value(serde_json::json!({ "scoring": { "watch": 55.0 } })).unwrap();
    assert_eq!(parsed.scoring.watch, 55.0);
    assert_eq!(parsed.scoring.monitor, 75.0);
    assert_eq!(parsed.healthy.min_liquidity_usd, 7500.0);
}
