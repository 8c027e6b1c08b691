//! Screening pipeline: one external-scheduler invocation over the feed.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures_util::future::join_all;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::SettingsStore;
use crate::events::EventSink;
use crate::indicators::compute_rsi;
use crate::metrics::Metrics;
use crate::models::candle::finite_closes;
use crate::models::coin::CanonicalCoin;
use crate::models::score::ScoreResult;
use crate::services::{CandleQuery, MarketFeed, VenueError};
use crate::signals::{evaluate, normalize};

/// Cap on how many top candidates get a candle refresh per tick.
const MAX_REFRESH: usize = 25;

#[derive(Debug, Clone, Serialize)]
pub struct ScreenedCoin {
    #[serde(flatten)]
    pub coin: CanonicalCoin,
    #[serde(flatten)]
    pub health: ScoreResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickSummary {
    pub processed: usize,
    pub column: String,
    pub elapsed_ms: u128,
    pub items: Vec<ScreenedCoin>,
}

pub struct ScreeningPipeline {
    settings: Arc<SettingsStore>,
    feed: Arc<dyn MarketFeed>,
    sink: Arc<dyn EventSink>,
    metrics: Option<Arc<Metrics>>,
}

impl ScreeningPipeline {
    pub fn new(
        settings: Arc<SettingsStore>,
        feed: Arc<dyn MarketFeed>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            settings,
            feed,
            sink,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Fetch one feed column and run every row through normalize + evaluate.
    /// No candle data is touched here; this is the cheap screening pass.
    pub async fn screen(
        &self,
        column: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<ScreenedCoin>, VenueError> {
        let settings = self.settings.snapshot().await;
        let column = column.unwrap_or(settings.discovery.column_key.as_str());
        let limit = limit
            .unwrap_or(settings.discovery.max_items)
            .clamp(1, 250);

        let items = self.feed.fetch_listings(column, limit).await?;
        let now_secs = Utc::now().timestamp();

        let screened = items
            .iter()
            .map(|item| {
                let coin = normalize(item);
                let health = evaluate(&settings, &coin, now_secs);
                self.observe(&health);
                ScreenedCoin {
                    coin,
                    health,
                    rsi: None,
                }
            })
            .collect();
        Ok(screened)
    }

    /// One scheduler invocation: screen the configured column, keep the
    /// eligible rows sorted by score, and refresh the oscillator for the
    /// top candidates concurrently. A failed candle fetch degrades that one
    /// coin to `rsi: None` and the tick carries on.
    pub async fn tick(&self) -> Result<TickSummary, VenueError> {
        let start = Instant::now();
        let settings = self.settings.snapshot().await;
        let column = settings.discovery.column_key.clone();

        let mut eligible: Vec<ScreenedCoin> = self
            .screen(Some(column.as_str()), Some(settings.discovery.max_items))
            .await?
            .into_iter()
            .filter(|row| row.health.eligible)
            .collect();
        eligible.sort_by(|a, b| b.health.score.cmp(&a.health.score));
        eligible.truncate(MAX_REFRESH.min(settings.discovery.max_items));

        let now_secs = Utc::now().timestamp();
        let from = now_secs - settings.rsi.lookback_secs();

        let refreshed = join_all(eligible.into_iter().map(|mut row| {
            let feed = self.feed.clone();
            let settings = settings.clone();
            async move {
                let query = CandleQuery {
                    pool_id: row.coin.id.clone(),
                    from,
                    to: now_secs,
                    interval: settings.rsi.interval.clone(),
                    pump_pool_id: None,
                };
                match feed.fetch_candles(&query).await {
                    Ok(candles) => {
                        let closes = finite_closes(&candles);
                        row.rsi = compute_rsi(&closes, settings.rsi.length);
                    }
                    Err(e) => {
                        debug!(coin = %row.coin.symbol, error = %e, "candle refresh failed");
                    }
                }
                row
            }
        }))
        .await;

        let summary = TickSummary {
            processed: refreshed.len(),
            column: column.clone(),
            elapsed_ms: start.elapsed().as_millis(),
            items: refreshed,
        };

        self.sink
            .append(
                "cron_tick",
                json!({
                    "ms": summary.elapsed_ms as u64,
                    "processed": summary.processed,
                    "col": column,
                }),
            )
            .await;

        Ok(summary)
    }

    fn observe(&self, health: &ScoreResult) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        metrics.evaluations_total.inc();
        for gate in &health.hard_fails {
            metrics
                .hard_fails_total
                .with_label_values(&[gate.as_str()])
                .inc();
        }
    }
}

/// Convenience for handlers that need to report a feed failure without
/// aborting their own response.
pub async fn log_api_error(sink: &dyn EventSink, location: &str, error: &VenueError) {
    warn!(location = location, error = %error, "collaborator call failed");
    sink.append(
        "api_error",
        json!({ "where": location, "error": error.to_string() }),
    )
    .await;
}
