//! HTTP endpoint server using Axum.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::advisory::{build_pack, AdvisoryRouter};
use crate::config::{Settings, SettingsStore};
use crate::core::runtime::{log_api_error, ScreeningPipeline};
use crate::events::EventSink;
use crate::metrics::Metrics;
use crate::models::coin::CanonicalCoin;
use crate::models::decision::{Intent, TradeMode};
use crate::services::venue::MarketFeed;
use crate::services::{AdvancedSettings, CandleQuery, PurchaseRequest, VenueClient};
use crate::signals::{evaluate, DecisionEngine, RecordEmitter};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<SettingsStore>,
    pub venue: Arc<VenueClient>,
    pub advisory: Arc<AdvisoryRouter>,
    pub pipeline: Arc<ScreeningPipeline>,
    pub sink: Arc<dyn EventSink>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Json(json!({
        "status": "healthy",
        "uptime_seconds": uptime_seconds,
        "service": "memetrix-decision-engine"
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics.
async fn metrics_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    state.metrics.http_requests_in_flight.dec();

    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json((*state.settings.snapshot().await).clone())
}

/// Replace the settings document. Structurally invalid documents are
/// rejected here and never reach an evaluation.
async fn put_settings(
    State(state): State<AppState>,
    Json(next): Json<Settings>,
) -> Result<Json<Value>, StatusCode> {
    match state.settings.replace(next).await {
        Ok(applied) => Ok(Json(json!({
            "success": true,
            "configVersion": applied.app.config_version
        }))),
        Err(e) => {
            warn!(error = %e, "rejected settings update");
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScreenQuery {
    col: Option<String>,
    limit: Option<usize>,
}

async fn screen_listings(
    State(state): State<AppState>,
    Query(params): Query<ScreenQuery>,
) -> Result<Json<Value>, StatusCode> {
    match state
        .pipeline
        .screen(params.col.as_deref(), params.limit)
        .await
    {
        Ok(coins) => Ok(Json(json!({ "success": true, "coins": coins }))),
        Err(e) => {
            log_api_error(state.sink.as_ref(), "screen", &e).await;
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

async fn run_tick(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    match state.pipeline.tick().await {
        Ok(summary) => Ok(Json(json!({ "success": true, "tick": summary }))),
        Err(e) => {
            log_api_error(state.sink.as_ref(), "tick", &e).await;
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandleWindow {
    from: i64,
    to: i64,
    interval: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecideRequest {
    coin: CanonicalCoin,
    pool_id: Option<String>,
    pump_pool_id: Option<i64>,
    candle: Option<CandleWindow>,
}

/// Full evaluation of one coin: re-score with the current settings, fetch
/// candles when eligible, decide, consult the advisory pool, emit records.
async fn decide(
    State(state): State<AppState>,
    Json(body): Json<DecideRequest>,
) -> Json<Value> {
    let settings = state.settings.snapshot().await;
    let coin = body.coin;
    let now_secs = Utc::now().timestamp();

    // Re-score with current settings so stale dashboard data cannot matter.
    let health = evaluate(&settings, &coin, now_secs);
    state.metrics.evaluations_total.inc();
    for gate in &health.hard_fails {
        state
            .metrics
            .hard_fails_total
            .with_label_values(&[gate.as_str()])
            .inc();
    }

    // Ineligible coins never pay for a candle fetch.
    let candles = if health.eligible {
        let interval = body
            .candle
            .as_ref()
            .map(|c| c.interval.clone())
            .unwrap_or_else(|| settings.rsi.interval.clone());
        let from = body
            .candle
            .as_ref()
            .map(|c| c.from)
            .unwrap_or_else(|| now_secs - settings.rsi.lookback_secs());
        let to = body.candle.as_ref().map(|c| c.to).unwrap_or(now_secs);
        let query = CandleQuery {
            pool_id: body.pool_id.clone().unwrap_or_else(|| coin.id.clone()),
            from,
            to,
            interval,
            pump_pool_id: body.pump_pool_id,
        };
        match state.venue.fetch_candles(&query).await {
            Ok(candles) => Some(candles),
            Err(e) => {
                log_api_error(state.sink.as_ref(), "candles", &e).await;
                None
            }
        }
    } else {
        None
    };

    let mut decision = DecisionEngine::decide(&settings, &coin, &health, candles.as_deref());

    if settings.llm.enabled && !settings.llm.endpoints.is_empty() {
        let pack = build_pack(&settings, &coin, &health, &decision);
        match state.advisory.route(&settings, &pack).await {
            Some(routed) => AdvisoryRouter::apply(&mut decision, routed),
            None => decision.reasons.push("advisory unavailable".to_string()),
        }
    }

    state
        .metrics
        .decisions_total
        .with_label_values(&[intent_label(decision.intent)])
        .inc();

    let (thought, proposal) =
        RecordEmitter::emit(decision, &settings, state.sink.as_ref()).await;

    Json(json!({ "success": true, "thought": thought, "proposal": proposal }))
}

fn intent_label(intent: Intent) -> &'static str {
    match intent {
        Intent::Buy => "buy",
        Intent::Sell => "sell",
        Intent::Hold => "hold",
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteRequest {
    action: Intent,
    pool_id: i64,
    amount: f64,
    is_sol: bool,
    cur_balance: Option<f64>,
}

/// Forward a proposal to the execution collaborator, honoring the paper/
/// live safety gates. Paper mode never reaches the venue.
async fn execute(
    State(state): State<AppState>,
    Json(body): Json<ExecuteRequest>,
) -> Result<Json<Value>, StatusCode> {
    let settings = state.settings.snapshot().await;

    if body.action == Intent::Hold {
        return Err(StatusCode::BAD_REQUEST);
    }
    if !settings.app.auto_execute {
        warn!("execute rejected: autoExecute is disabled");
        return Err(StatusCode::BAD_REQUEST);
    }
    if settings.app.mode == TradeMode::Live && !settings.app.enable_live_trading {
        warn!("execute rejected: live mode without enableLiveTrading");
        return Err(StatusCode::BAD_REQUEST);
    }

    let cur_balance = body.cur_balance.unwrap_or(settings.venue.cur_balance_sol);

    if settings.app.mode == TradeMode::Paper {
        state
            .sink
            .append(
                "trade_execute_paper",
                json!({
                    "action": intent_label(body.action),
                    "pool_id": body.pool_id,
                    "amount": body.amount,
                    "is_sol": body.is_sol,
                    "cur_balance": cur_balance,
                }),
            )
            .await;
        return Ok(Json(json!({ "success": true, "mode": "paper", "simulated": true })));
    }

    let slippage = match body.action {
        Intent::Buy => settings.execution.buy_slippage,
        _ => settings.execution.sell_slippage,
    };
    let request = PurchaseRequest {
        amount: body.amount,
        purchase_dir: intent_label(body.action).to_string(),
        is_sol: body.is_sol,
        pool_id: body.pool_id,
        cur_balance,
        wallets: settings.venue.wallets.clone(),
        associated_accs: settings.venue.associated_accs.clone(),
        advanced_settings: AdvancedSettings {
            slippage,
            use_private_node: settings.execution.use_private_node,
            priority: settings.execution.priority,
            bribery: settings.execution.bribery,
            strategy: settings.execution.strategy.clone(),
        },
    };

    match state.venue.purchase(&request).await {
        Ok(response) => {
            state
                .sink
                .append(
                    "trade_execute_live",
                    json!({ "payload": request, "response": response.clone() }),
                )
                .await;
            Ok(Json(response))
        }
        Err(e) => {
            log_api_error(state.sink.as_ref(), "execute", &e).await;
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/settings", get(get_settings))
        .route("/api/settings", put(put_settings))
        .route("/api/screen", get(screen_listings))
        .route("/api/tick", post(run_tick))
        .route("/api/decide", post(decide))
        .route("/api/execute", post(execute))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    port: u16,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
