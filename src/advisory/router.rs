//! Advisory routing: least-loaded dispatch to an OpenAI-compatible chat
//! endpoint, verdict parsing, and the asymmetric override policy.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::advisory::pool::{WorkerLease, WorkerPool};
use crate::config::Settings;
use crate::metrics::Metrics;
use crate::models::coin::{CanonicalCoin, CoinAudit};
use crate::models::decision::{Advisory, Decision, Intent, Verdict};
use crate::models::score::{ScoreResult, Tier};

/// Compact context sent to an advisory worker. Deliberately not the full
/// coin record: the worker sees what the operator would see on the card.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextPack {
    pub symbol: String,
    pub name: String,
    pub token_address: String,
    pub pool_address: String,
    pub mcap: f64,
    pub liquidity_usd: f64,
    pub liq_ratio: f64,
    pub volume: f64,
    pub buys: f64,
    pub sells: f64,
    pub sell_ratio: f64,
    pub audit: CoinAudit,
    pub health_score: i64,
    pub tier: Tier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swing_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swing_high: Option<f64>,
    pub plan: PackPlan,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackPlan {
    pub entry_min: f64,
    pub entry_max: f64,
    pub target_multiplier: f64,
    pub stop_multiplier: f64,
}

pub fn build_pack(
    settings: &Settings,
    coin: &CanonicalCoin,
    health: &ScoreResult,
    decision: &Decision,
) -> ContextPack {
    ContextPack {
        symbol: coin.symbol.clone(),
        name: coin.name.clone(),
        token_address: coin.token_address.clone(),
        pool_address: coin.pool_address.clone(),
        mcap: coin.mcap,
        liquidity_usd: coin.liquidity_usd,
        liq_ratio: health.computed.liq_ratio,
        volume: coin.volume,
        buys: coin.buys,
        sells: coin.sells,
        sell_ratio: health.computed.sell_ratio,
        audit: coin.audit.clone(),
        health_score: health.score,
        tier: health.tier,
        rsi: decision.signals.rsi,
        swing_low: decision.signals.swing_low,
        swing_high: decision.signals.swing_high,
        plan: PackPlan {
            entry_min: settings.trade_plan.entry_mcap_min,
            entry_max: settings.trade_plan.entry_mcap_max,
            target_multiplier: settings.trade_plan.target_multiplier,
            stop_multiplier: settings.trade_plan.stop_multiplier,
        },
    }
}

#[derive(Debug, Clone)]
pub struct RoutedVerdict {
    pub worker: String,
    pub verdict: Verdict,
}

pub struct AdvisoryRouter {
    pool: Arc<WorkerPool>,
    http: reqwest::Client,
    metrics: Option<Arc<Metrics>>,
}

impl AdvisoryRouter {
    pub fn new(pool: Arc<WorkerPool>) -> Self {
        Self {
            pool,
            http: reqwest::Client::new(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    /// Ask the least-loaded eligible worker for a verdict.
    ///
    /// Every non-verdict outcome (advisory disabled, pool at capacity,
    /// transport error, timeout, malformed body) is `None`, never an
    /// engine failure. The lease guard releases capacity on all of them.
    pub async fn route(&self, settings: &Settings, pack: &ContextPack) -> Option<RoutedVerdict> {
        if !settings.llm.enabled || settings.llm.endpoints.is_empty() {
            return None;
        }

        self.pool.sync_with(&settings.llm).await;
        let lease = match self.pool.acquire().await {
            Some(lease) => lease,
            None => {
                self.observe("saturated");
                return None;
            }
        };

        if let Some(m) = &self.metrics {
            m.advisory_in_flight.inc();
        }
        let result = self.dispatch(settings, &lease, pack).await;
        if let Some(m) = &self.metrics {
            m.advisory_in_flight.dec();
        }

        match result {
            Some(verdict) => {
                self.observe("ok");
                Some(RoutedVerdict {
                    worker: lease.worker().key().to_string(),
                    verdict,
                })
            }
            None => {
                self.observe("unavailable");
                None
            }
        }
    }

    async fn dispatch(
        &self,
        settings: &Settings,
        lease: &WorkerLease,
        pack: &ContextPack,
    ) -> Option<Verdict> {
        let worker = lease.worker();

        let pack_json = match serde_json::to_string(pack) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "failed to serialize advisory pack");
                return None;
            }
        };
        let user = settings
            .llm
            .prompts
            .decision_user_template
            .replace("{{pack}}", &pack_json);

        let body = json!({
            "model": worker.model(),
            "messages": [
                { "role": "system", "content": settings.llm.prompts.decision_system },
                { "role": "user", "content": user },
            ],
            "temperature": 0.2,
            "response_format": { "type": "json_object" },
        });

        let url = format!("{}/v1/chat/completions", worker.base_url());
        let mut request = self.http.post(&url).json(&body);
        if !worker.api_key().is_empty() {
            request = request.bearer_auth(worker.api_key());
        }

        let response = match tokio::time::timeout(worker.timeout(), request.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(worker = worker.key(), error = %e, "advisory request failed");
                return None;
            }
            Err(_) => {
                warn!(worker = worker.key(), "advisory request timed out");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(worker = worker.key(), status = %response.status(), "advisory returned error status");
            return None;
        }

        let payload: Value = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(worker = worker.key(), error = %e, "advisory body was not JSON");
                return None;
            }
        };

        let content = payload["choices"][0]["message"]["content"].as_str()?;
        let parsed: Value = serde_json::from_str(content).ok()?;
        Some(parse_verdict(&parsed))
    }

    fn observe(&self, outcome: &str) {
        if let Some(m) = &self.metrics {
            m.advisory_requests_total.with_label_values(&[outcome]).inc();
        }
    }

    /// Asymmetric override policy. Advisory input can veto or confirm a
    /// buy and can request an exit; it can never originate a buy.
    pub fn apply(decision: &mut Decision, routed: RoutedVerdict) {
        let mut advisory = Advisory {
            worker: routed.worker,
            verdict: routed.verdict,
            note: None,
        };

        match advisory.verdict.intent {
            Intent::Hold => {
                if decision.intent != Intent::Hold {
                    decision.intent = Intent::Hold;
                    decision.reasons.push("advisory vetoed entry".to_string());
                }
            }
            Intent::Buy => {
                if decision.intent != Intent::Buy {
                    advisory.note = Some(
                        "advisory suggested buy, but hard entry conditions did not pass; holding"
                            .to_string(),
                    );
                }
            }
            Intent::Sell => {
                // Exits are strictly risk-reducing; the position ledger
                // check happens downstream.
                decision.intent = Intent::Sell;
                decision.reasons.push("advisory requested exit".to_string());
            }
        }

        decision.advisory = Some(advisory);
    }
}

/// Coerce a worker's free-form JSON into a Verdict. Anything that is not
/// explicitly buy or sell is hold.
fn parse_verdict(parsed: &Value) -> Verdict {
    let intent = match parsed["intent"].as_str() {
        Some("buy") => Intent::Buy,
        Some("sell") => Intent::Sell,
        _ => Intent::Hold,
    };
    Verdict {
        intent,
        confidence: parsed["confidence"].as_f64().unwrap_or(0.0),
        rationale: string_list(&parsed["rationale"]),
        risks: string_list(&parsed["risks"]),
        invalidations: string_list(&parsed["invalidations"]),
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value.as_array() {
        Some(items) => items
            .iter()
            .map(|v| match v.as_str() {
                Some(s) => s.to_string(),
                None => v.to_string(),
            })
            .collect(),
        None => Vec::new(),
    }
}
