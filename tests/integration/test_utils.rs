//! Helper structure bundling together the HTTP server and mocked
//! collaborators.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Instant;

use axum_test::TestServer;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use memetrix::advisory::{AdvisoryRouter, WorkerPool};
use memetrix::config::{LlmEndpoint, Settings, SettingsStore};
use memetrix::core::http::{create_router, AppState};
use memetrix::core::runtime::ScreeningPipeline;
use memetrix::events::MemoryEventSink;
use memetrix::metrics::Metrics;
use memetrix::services::VenueClient;

pub struct TestApp {
    pub server: TestServer,
    pub venue_mock: MockServer,
    pub sink: Arc<MemoryEventSink>,
    pub settings: Arc<SettingsStore>,
    pub pool: Arc<WorkerPool>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_settings(|_| {}).await
    }

    pub async fn with_settings(customize: impl FnOnce(&mut Settings)) -> Self {
        let venue_mock = MockServer::start().await;

        let mut settings = Settings::default();
        settings.venue.base_url = venue_mock.uri();
        customize(&mut settings);

        let settings = Arc::new(SettingsStore::new(settings).expect("valid test settings"));
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let sink = Arc::new(MemoryEventSink::new());
        let venue = Arc::new(
            VenueClient::new(&settings.snapshot().await.venue).expect("venue client"),
        );
        let pool = Arc::new(WorkerPool::new());
        let advisory = Arc::new(AdvisoryRouter::new(pool.clone()).with_metrics(metrics.clone()));
        let pipeline = Arc::new(
            ScreeningPipeline::new(settings.clone(), venue.clone(), sink.clone())
                .with_metrics(metrics.clone()),
        );

        let state = AppState {
            settings: settings.clone(),
            venue,
            advisory,
            pipeline,
            sink: sink.clone(),
            metrics,
            start_time: Arc::new(Instant::now()),
        };

        let server = TestServer::new(create_router(state)).expect("start test server");

        Self {
            server,
            venue_mock,
            sink,
            settings,
            pool,
        }
    }
}

pub fn llm_endpoint(base_url: &str, max_concurrency: usize) -> LlmEndpoint {
    LlmEndpoint {
        name: "local".to_string(),
        base_url: base_url.to_string(),
        api_key: String::new(),
        model: "test-model".to_string(),
        max_concurrency,
        timeout_ms: 2_000,
    }
}

/// A feed row that normalizes into a clean, full-score trade candidate.
pub fn healthy_listing_item(id: &str, symbol: &str) -> Value {
    json!({
        "id": id,
        "attributes": {
            "symbol": symbol,
            "name": format!("{symbol} Coin"),
            "tokenAddress": format!("{symbol}TokenAddr"),
            "address": format!("{symbol}PoolAddr"),
            "fdv": "20000",
            "cur_liq": { "usd": "12000", "quote": "55" },
            "volume": "50000",
            "buys_count": 100,
            "sells_count": 80,
            "created_timestamp": 1_700_000_000u32,
            "holders_count": 400,
            "dev_holding_perc": "2.0",
            "insiders_holding_perc": "1.0",
            "snipers_holding_perc": "3.0",
            "bundle_holders_count": 40,
            "audit": {
                "mint_authority": false,
                "freeze_authority": false,
                "lp_burned_perc": 95.0,
                "top_holders_perc": "20"
            }
        }
    })
}

/// A feed row with a mint authority still enabled: hard fail.
pub fn gated_listing_item(id: &str, symbol: &str) -> Value {
    let mut item = healthy_listing_item(id, symbol);
    item["attributes"]["audit"]["mint_authority"] = json!(true);
    item
}

pub async fn mock_listings(server: &MockServer, column: &str, items: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/api/memescope/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "columns": { column: { "data": items } }
            })),
        )
        .mount(server)
        .await;
}

/// Wire-format candles (millisecond timestamps, stringly prices) from a
/// close series.
pub fn wire_candles(closes: &[f64]) -> Value {
    let bars: Vec<Value> = closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            json!({
                "timestamp": (1_700_000_000_000i64 + i as i64 * 60_000),
                "o": close.to_string(),
                "h": (close + 0.5).to_string(),
                "l": (close - 0.5).to_string(),
                "c": close.to_string(),
                "volume": 1000.0
            })
        })
        .collect();
    Value::Array(bars)
}

pub async fn mock_candles(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/charts/tradingview_range"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mock_candles_failure(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/charts/tradingview_range"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}

/// Close series that satisfies the default entry conditions: RSI ~26.5 and
/// rising.
pub fn entry_ready_closes() -> Vec<f64> {
    let mut closes = vec![100.0];
    for _ in 0..10 {
        closes.push(closes.last().copied().unwrap_or(0.0) - 1.0);
    }
    for _ in 0..9 {
        closes.push(closes.last().copied().unwrap_or(0.0) + 0.2);
    }
    closes
}

/// OpenAI-style chat completion whose content is a verdict document.
pub fn chat_completion(verdict: Value) -> Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": verdict.to_string() } }
        ]
    })
}

pub async fn mock_advisory(server: &MockServer, verdict: Value) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion(verdict)))
        .mount(server)
        .await;
}
