//! HTTP client for the trading venue: listing feed, candle charts, and the
//! purchase endpoint.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::VenueSettings;
use crate::models::candle::Candle;
use crate::models::coin::{LooseNum, RawListingItem};

const USER_AGENT: &str = concat!("memetrix/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum VenueError {
    #[error("venue request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("venue returned malformed payload: {0}")]
    Malformed(String),
}

/// Market-data side of the venue, behind a trait so the screening pipeline
/// can run against a fake in tests.
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Raw listing rows for one feed column, capped at `limit`.
    async fn fetch_listings(
        &self,
        column: &str,
        limit: usize,
    ) -> Result<Vec<RawListingItem>, VenueError>;

    /// Ordered candle series for a pool. Duplicate timestamps from the
    /// collaborator are tolerated; the last bar per timestamp wins.
    async fn fetch_candles(&self, query: &CandleQuery) -> Result<Vec<Candle>, VenueError>;
}

#[derive(Debug, Clone)]
pub struct CandleQuery {
    pub pool_id: String,
    /// Unix seconds, inclusive window.
    pub from: i64,
    pub to: i64,
    pub interval: String,
    pub pump_pool_id: Option<i64>,
}

/// Purchase payload, mirroring what the venue's purchase endpoint expects.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseRequest {
    pub amount: f64,
    pub purchase_dir: String,
    pub is_sol: bool,
    pub pool_id: i64,
    pub cur_balance: f64,
    pub wallets: String,
    pub associated_accs: String,
    pub advanced_settings: AdvancedSettings,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvancedSettings {
    pub slippage: f64,
    pub use_private_node: bool,
    pub priority: f64,
    pub bribery: f64,
    pub strategy: String,
}

#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    columns: HashMap<String, ListingColumn>,
}

#[derive(Debug, Deserialize, Default)]
struct ListingColumn {
    #[serde(default)]
    data: Vec<RawListingItem>,
}

/// Wire candle: millisecond timestamp, prices as decimal strings.
#[derive(Debug, Deserialize)]
struct RawCandle {
    timestamp: i64,
    o: Option<LooseNum>,
    h: Option<LooseNum>,
    l: Option<LooseNum>,
    c: Option<LooseNum>,
    #[serde(default)]
    volume: Option<LooseNum>,
}

pub struct VenueClient {
    base_url: String,
    cookie: String,
    http: Client,
}

impl VenueClient {
    pub fn new(settings: &VenueSettings) -> Result<Self, VenueError> {
        // Env override wins so the session secret can stay out of the
        // settings document.
        let cookie = std::env::var("VENUE_COOKIE").unwrap_or_else(|_| settings.cookie.clone());
        Self::from_parts(&settings.base_url, &cookie)
    }

    pub fn from_parts(base_url: &str, cookie: &str) -> Result<Self, VenueError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie: cookie.to_string(),
            http,
        })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self.http.get(format!("{}{}", self.base_url, path));
        if !self.cookie.is_empty() {
            request = request.header(reqwest::header::COOKIE, self.cookie.clone());
        }
        request
    }

    async fn listings_once(&self) -> Result<ListingResponse, VenueError> {
        let response = self
            .get("/api/memescope/search")
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Forward a purchase to the venue. Only the live execution path calls
    /// this; paper mode never reaches the client.
    pub async fn purchase(&self, request: &PurchaseRequest) -> Result<Value, VenueError> {
        let mut builder = self
            .http
            .post(format!("{}/api/purchases", self.base_url))
            .json(request);
        if !self.cookie.is_empty() {
            builder = builder.header(reqwest::header::COOKIE, self.cookie.clone());
        }
        let response = builder.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl MarketFeed for VenueClient {
    async fn fetch_listings(
        &self,
        column: &str,
        limit: usize,
    ) -> Result<Vec<RawListingItem>, VenueError> {
        let response = (|| async { self.listings_once().await })
            .retry(ExponentialBuilder::default().with_max_times(2))
            .when(|e| matches!(e, VenueError::Transport(_)))
            .await?;

        let mut items = response
            .columns
            .get(column)
            .map(|col| col.data.clone())
            .unwrap_or_default();
        items.truncate(limit);
        Ok(items)
    }

    async fn fetch_candles(&self, query: &CandleQuery) -> Result<Vec<Candle>, VenueError> {
        let mut params: Vec<(String, String)> = vec![
            ("pool_id".into(), query.pool_id.clone()),
            ("from".into(), query.from.to_string()),
            ("to".into(), query.to.to_string()),
            ("interval".into(), query.interval.clone()),
            ("amount_index".into(), "0".into()),
            ("r_from".into(), query.from.to_string()),
            ("r_to".into(), "0".into()),
            ("cb".into(), "0".into()),
            ("currency".into(), "usd".into()),
        ];
        if let Some(pump_pool_id) = query.pump_pool_id {
            params.push(("pump_pool_id".into(), pump_pool_id.to_string()));
        }

        let response = self
            .get("/api/charts/tradingview_range")
            .query(&params)
            .send()
            .await?
            .error_for_status()?;

        let raw: Vec<RawCandle> = response
            .json()
            .await
            .map_err(|e| VenueError::Malformed(e.to_string()))?;
        Ok(clean_series(raw))
    }
}

/// Drop bars without a finite close, deduplicate timestamps keeping the
/// last bar, and sort ascending.
fn clean_series(raw: Vec<RawCandle>) -> Vec<Candle> {
    let mut by_ts: HashMap<i64, Candle> = HashMap::new();
    for bar in raw {
        let close = match bar.c.as_ref().and_then(LooseNum::as_f64) {
            Some(close) => close,
            None => continue,
        };
        let loose = |v: &Option<LooseNum>| v.as_ref().and_then(LooseNum::as_f64);
        let ts_secs = bar.timestamp / 1000;
        by_ts.insert(
            ts_secs,
            Candle::new(
                ts_secs,
                loose(&bar.o).unwrap_or(close),
                loose(&bar.h).unwrap_or(close),
                loose(&bar.l).unwrap_or(close),
                close,
                loose(&bar.volume).unwrap_or(0.0),
            ),
        );
    }

    let mut candles: Vec<Candle> = by_ts.into_values().collect();
    candles.sort_by_key(|c| c.timestamp);
    candles
}
