//! Settings document, validation, and the shared settings store.
//!
//! Settings are a single serde document matching the shape the dashboard
//! edits. The engine never mutates a snapshot: evaluations borrow an
//! `Arc<Settings>` for their whole lifetime and concurrent updates only
//! affect later evaluations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use url::Url;

use crate::models::decision::TradeMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid settings: {field}: {detail}")]
    Invalid { field: &'static str, detail: String },
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings document: {0}")]
    Parse(#[from] serde_json::Error),
}

fn invalid(field: &'static str, detail: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        detail: detail.into(),
    }
}

/// Deployment environment, used to pick the log format.
pub fn get_environment() -> String {
    std::env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub app: AppSettings,
    pub discovery: DiscoverySettings,
    pub healthy: HealthSettings,
    pub scoring: ScoringSettings,
    pub rsi: RsiSettings,
    pub trade_plan: TradePlanSettings,
    pub venue: VenueSettings,
    pub execution: ExecutionSettings,
    pub llm: LlmSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Bumped by the operator when critical knobs change; stamped into every
    /// emitted decision so logged records stay reproducible.
    pub config_version: u32,
    pub mode: TradeMode,
    pub auto_execute: bool,
    pub enable_live_trading: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            config_version: 1,
            mode: TradeMode::Paper,
            auto_execute: false,
            enable_live_trading: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoverySettings {
    /// Feed column the screener reads, e.g. "col1".
    pub column_key: String,
    pub max_items: usize,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            column_key: "col1".to_string(),
            max_items: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthSettings {
    pub min_liquidity_usd: f64,
    pub min_market_cap_usd: f64,
    /// Soft ceiling: exceeding it is a score penalty, never a hard fail, so
    /// large caps stay monitorable. `None` disables the ceiling.
    pub max_market_cap_usd: Option<f64>,
    pub min_liq_ratio: f64,
    pub warn_liq_ratio: f64,
    pub audit: AuditSettings,
    pub holders: HolderSettings,
    pub flow: FlowSettings,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            min_liquidity_usd: 7500.0,
            min_market_cap_usd: 12000.0,
            max_market_cap_usd: Some(250_000.0),
            min_liq_ratio: 0.02,
            warn_liq_ratio: 0.03,
            audit: AuditSettings::default(),
            holders: HolderSettings::default(),
            flow: FlowSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditSettings {
    pub require_mint_authority_false: bool,
    pub require_freeze_authority_false: bool,
    /// Hard floor, only applied when the feed reports an LP-burned figure.
    pub min_lp_burned_perc_if_present: f64,
    pub warn_lp_burned_perc: f64,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            require_mint_authority_false: true,
            require_freeze_authority_false: true,
            min_lp_burned_perc_if_present: 80.0,
            warn_lp_burned_perc: 90.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HolderSettings {
    pub warn_dev_hold_perc: f64,
    pub max_dev_hold_perc: f64,
    pub warn_snipers_hold_perc: f64,
    pub max_snipers_hold_perc: f64,
    pub warn_insiders_hold_perc: f64,
    pub max_insiders_hold_perc: f64,
    pub bundle_ratio_warn: f64,
    pub bundle_ratio_fail: f64,
}

impl Default for HolderSettings {
    fn default() -> Self {
        Self {
            warn_dev_hold_perc: 5.0,
            max_dev_hold_perc: 8.0,
            warn_snipers_hold_perc: 10.0,
            max_snipers_hold_perc: 20.0,
            warn_insiders_hold_perc: 5.0,
            max_insiders_hold_perc: 10.0,
            bundle_ratio_warn: 0.25,
            bundle_ratio_fail: 0.40,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowSettings {
    pub sell_ratio_warn: f64,
    pub sell_ratio_fail: f64,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            sell_ratio_warn: 1.15,
            sell_ratio_fail: 1.35,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringSettings {
    pub watch: f64,
    pub monitor: f64,
    pub trade_candidate: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            watch: 60.0,
            monitor: 75.0,
            trade_candidate: 85.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RsiSettings {
    pub length: usize,
    pub entry_rsi_min: f64,
    pub entry_rsi_max: f64,
    pub avoid_entry_rsi_above: f64,
    pub exit_rsi: f64,
    /// Candle sampling interval, e.g. "5s" or "1m".
    pub interval: String,
    pub bars_lookback: usize,
}

impl Default for RsiSettings {
    fn default() -> Self {
        Self {
            length: 14,
            entry_rsi_min: 25.0,
            entry_rsi_max: 40.0,
            avoid_entry_rsi_above: 65.0,
            exit_rsi: 72.0,
            interval: "5s".to_string(),
            bars_lookback: 240,
        }
    }
}

impl RsiSettings {
    /// Seconds per candle for the configured interval. Malformed intervals
    /// fall back to one minute, matching what the chart collaborator assumes.
    pub fn interval_secs(&self) -> i64 {
        parse_interval_secs(&self.interval)
    }

    /// Default candle window in seconds for one evaluation.
    pub fn lookback_secs(&self) -> i64 {
        self.bars_lookback as i64 * self.interval_secs()
    }
}

pub fn parse_interval_secs(interval: &str) -> i64 {
    let (digits, unit) = interval.split_at(interval.len().saturating_sub(1));
    let n: i64 = match digits.parse() {
        Ok(n) if n > 0 => n,
        _ => return 60,
    };
    match unit {
        "s" => n,
        "m" => n * 60,
        _ => 60,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradePlanSettings {
    pub entry_mcap_min: f64,
    pub entry_mcap_max: f64,
    pub target_multiplier: f64,
    pub stop_multiplier: f64,
}

impl Default for TradePlanSettings {
    fn default() -> Self {
        Self {
            entry_mcap_min: 18000.0,
            entry_mcap_max: 24000.0,
            target_multiplier: 1.70,
            stop_multiplier: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VenueSettings {
    pub base_url: String,
    /// Session cookie for authenticated venue endpoints; env override wins
    /// so the secret can stay out of the settings document.
    pub cookie: String,
    pub wallets: String,
    pub associated_accs: String,
    pub cur_balance_sol: f64,
}

impl Default for VenueSettings {
    fn default() -> Self {
        Self {
            base_url: "https://photon-sol.tinyastro.io".to_string(),
            cookie: String::new(),
            wallets: String::new(),
            associated_accs: String::new(),
            cur_balance_sol: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecutionSettings {
    pub default_buy_sol: f64,
    pub buy_slippage: f64,
    pub sell_slippage: f64,
    pub use_private_node: bool,
    pub priority: f64,
    pub bribery: f64,
    pub strategy: String,
    pub sell_perc: f64,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            default_buy_sol: 0.01,
            buy_slippage: 5.0,
            sell_slippage: 20.0,
            use_private_node: true,
            priority: 0.0001,
            bribery: 0.0001,
            strategy: "default".to_string(),
            sell_perc: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LlmSettings {
    pub enabled: bool,
    /// Ordered list of advisory workers; order is the tie-breaker when two
    /// workers carry the same in-flight load.
    pub endpoints: Vec<LlmEndpoint>,
    pub prompts: LlmPrompts,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoints: Vec::new(),
            prompts: LlmPrompts::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LlmEndpoint {
    pub name: String,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_concurrency: usize,
    pub timeout_ms: u64,
}

impl Default for LlmEndpoint {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_url: String::new(),
            api_key: String::new(),
            model: String::new(),
            max_concurrency: 1,
            timeout_ms: 20_000,
        }
    }
}

impl LlmEndpoint {
    /// Stable worker identity: survives renames, changes with address/model.
    pub fn worker_key(&self) -> String {
        format!("{}||{}", self.base_url.trim_end_matches('/'), self.model)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LlmPrompts {
    pub decision_system: String,
    pub decision_user_template: String,
}

impl Default for LlmPrompts {
    fn default() -> Self {
        Self {
            decision_system: "You are a cautious trading copilot. You must output strict JSON only."
                .to_string(),
            decision_user_template:
                "Given this compact pack, decide intent (buy/sell/hold) and return JSON with rationale, risks, invalidations, confidence.\nPACK:\n{{pack}}"
                    .to_string(),
        }
    }
}

fn check_pct(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(field, format!("{value} is outside [0, 100]")));
    }
    Ok(())
}

fn check_unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, format!("{value} is outside [0, 1]")));
    }
    Ok(())
}

impl Settings {
    /// Structural validation. Runs at load and on every settings update;
    /// an evaluation never sees a settings snapshot that failed here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scoring;
        if !(s.watch < s.monitor && s.monitor < s.trade_candidate) {
            return Err(invalid(
                "scoring",
                format!(
                    "cut points must be ascending: watch {} < monitor {} < tradeCandidate {}",
                    s.watch, s.monitor, s.trade_candidate
                ),
            ));
        }
        check_pct("scoring.watch", s.watch)?;
        check_pct("scoring.monitor", s.monitor)?;
        check_pct("scoring.tradeCandidate", s.trade_candidate)?;

        let p = &self.trade_plan;
        if p.entry_mcap_min > p.entry_mcap_max {
            return Err(invalid(
                "tradePlan",
                format!(
                    "entryMcapMin {} exceeds entryMcapMax {}",
                    p.entry_mcap_min, p.entry_mcap_max
                ),
            ));
        }
        if p.target_multiplier <= 1.0 {
            return Err(invalid(
                "tradePlan.targetMultiplier",
                format!("{} must be > 1", p.target_multiplier),
            ));
        }
        if p.stop_multiplier <= 0.0 || p.stop_multiplier >= 1.0 {
            return Err(invalid(
                "tradePlan.stopMultiplier",
                format!("{} must be in (0, 1)", p.stop_multiplier),
            ));
        }

        let h = &self.healthy;
        if h.min_liquidity_usd < 0.0 || h.min_market_cap_usd < 0.0 {
            return Err(invalid("healthy", "liquidity/mcap floors must be non-negative"));
        }
        check_pct(
            "healthy.audit.minLpBurnedPercIfPresent",
            h.audit.min_lp_burned_perc_if_present,
        )?;
        check_pct("healthy.audit.warnLpBurnedPerc", h.audit.warn_lp_burned_perc)?;
        check_pct("healthy.holders.warnDevHoldPerc", h.holders.warn_dev_hold_perc)?;
        check_pct("healthy.holders.maxDevHoldPerc", h.holders.max_dev_hold_perc)?;
        check_pct("healthy.holders.warnSnipersHoldPerc", h.holders.warn_snipers_hold_perc)?;
        check_pct("healthy.holders.maxSnipersHoldPerc", h.holders.max_snipers_hold_perc)?;
        check_pct("healthy.holders.warnInsidersHoldPerc", h.holders.warn_insiders_hold_perc)?;
        check_pct("healthy.holders.maxInsidersHoldPerc", h.holders.max_insiders_hold_perc)?;
        check_unit("healthy.holders.bundleRatioWarn", h.holders.bundle_ratio_warn)?;
        check_unit("healthy.holders.bundleRatioFail", h.holders.bundle_ratio_fail)?;

        let r = &self.rsi;
        if r.length == 0 {
            return Err(invalid("rsi.length", "must be >= 1"));
        }
        if r.bars_lookback == 0 {
            return Err(invalid("rsi.barsLookback", "must be >= 1"));
        }
        check_pct("rsi.entryRsiMin", r.entry_rsi_min)?;
        check_pct("rsi.entryRsiMax", r.entry_rsi_max)?;
        check_pct("rsi.avoidEntryRsiAbove", r.avoid_entry_rsi_above)?;
        check_pct("rsi.exitRsi", r.exit_rsi)?;
        if r.entry_rsi_min > r.entry_rsi_max {
            return Err(invalid(
                "rsi",
                format!("entryRsiMin {} exceeds entryRsiMax {}", r.entry_rsi_min, r.entry_rsi_max),
            ));
        }

        check_pct("execution.buySlippage", self.execution.buy_slippage)?;
        check_pct("execution.sellSlippage", self.execution.sell_slippage)?;
        check_pct("execution.sellPerc", self.execution.sell_perc)?;

        Url::parse(&self.venue.base_url)
            .map_err(|e| invalid("venue.baseUrl", e.to_string()))?;

        for endpoint in &self.llm.endpoints {
            Url::parse(&endpoint.base_url)
                .map_err(|e| invalid("llm.endpoints.baseUrl", e.to_string()))?;
            if endpoint.model.is_empty() {
                return Err(invalid("llm.endpoints.model", "must not be empty"));
            }
            if endpoint.max_concurrency == 0 {
                return Err(invalid("llm.endpoints.maxConcurrency", "must be >= 1"));
            }
            if endpoint.timeout_ms == 0 {
                return Err(invalid("llm.endpoints.timeoutMs", "must be >= 1"));
            }
        }

        Ok(())
    }

    /// Load from the file named by `MEMETRIX_SETTINGS_PATH`, or defaults.
    /// Fails fast on unreadable, unparsable, or out-of-range documents.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = match std::env::var("MEMETRIX_SETTINGS_PATH") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path, source })?;
                serde_json::from_str(&raw)?
            }
            Err(_) => Self::default(),
        };
        settings.validate()?;
        Ok(settings)
    }
}

/// Shared settings snapshot with get/replace semantics.
///
/// Readers hold an `Arc<Settings>` so an update mid-evaluation never mixes
/// two revisions inside one evaluation.
pub struct SettingsStore {
    current: RwLock<Arc<Settings>>,
}

impl SettingsStore {
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            current: RwLock::new(Arc::new(settings)),
        })
    }

    pub async fn snapshot(&self) -> Arc<Settings> {
        self.current.read().await.clone()
    }

    pub async fn replace(&self, next: Settings) -> Result<Arc<Settings>, ConfigError> {
        next.validate()?;
        let next = Arc::new(next);
        *self.current.write().await = next.clone();
        Ok(next)
    }
}
