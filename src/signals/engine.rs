//! Decision engine: fuses tier, market-cap window, and technical signal
//! into a trade intent.

use crate::config::Settings;
use crate::indicators::{compute_rsi, rsi_slope, swing_range};
use crate::models::candle::{finite_closes, Candle};
use crate::models::coin::CanonicalCoin;
use crate::models::decision::{Decision, Intent, PlanSnapshot, SignalSnapshot};
use crate::models::score::{ScoreResult, Tier};

/// Bars the RSI slope is measured across.
pub const RSI_SLOPE_WINDOW: usize = 4;

pub const REASON_NOT_CANDIDATE: &str = "not a trade candidate";
pub const REASON_WAITING_ENTRY: &str = "trade candidate but waiting for entry conditions";
pub const REASON_CANDLES_UNAVAILABLE: &str = "candles unavailable";

pub struct DecisionEngine;

impl DecisionEngine {
    /// Produce a Decision for an already-scored coin.
    ///
    /// `candles` is `None` when the series was never fetched: either the
    /// coin is ineligible (ineligible coins never pay for candle data) or
    /// the collaborator failed and the evaluation degrades.
    pub fn decide(
        settings: &Settings,
        coin: &CanonicalCoin,
        health: &ScoreResult,
        candles: Option<&[Candle]>,
    ) -> Decision {
        let rsi_cfg = &settings.rsi;
        let plan_cfg = &settings.trade_plan;

        let (rsi, slope, swing) = match candles {
            Some(candles) if health.eligible => {
                let closes = finite_closes(candles);
                (
                    compute_rsi(&closes, rsi_cfg.length),
                    rsi_slope(&closes, rsi_cfg.length, RSI_SLOPE_WINDOW),
                    swing_range(candles, rsi_cfg.bars_lookback),
                )
            }
            _ => (None, None, None),
        };
        let (swing_low, swing_high) = match swing {
            Some((low, high)) => (Some(low), Some(high)),
            None => (None, None),
        };

        let mcap = coin.mcap;
        let plan = PlanSnapshot {
            entry_mcap_min: plan_cfg.entry_mcap_min,
            entry_mcap_max: plan_cfg.entry_mcap_max,
            target_mcap: mcap * plan_cfg.target_multiplier,
            stop_mcap: mcap * plan_cfg.stop_multiplier,
        };

        // All four entry conditions must hold simultaneously; an absent RSI
        // is condition-not-met, never "unknown passes".
        let mcap_in_window = mcap >= plan.entry_mcap_min && mcap <= plan.entry_mcap_max;
        let rsi_ok = rsi.is_some_and(|v| v >= rsi_cfg.entry_rsi_min && v <= rsi_cfg.entry_rsi_max);
        let rsi_rising = slope.is_some_and(|s| s > 0.0);

        let mut intent = Intent::Hold;
        let mut reasons: Vec<String> = Vec::new();

        if health.eligible && health.tier == Tier::TradeCandidate {
            if mcap_in_window && rsi_ok && rsi_rising {
                intent = Intent::Buy;
                reasons.push("eligible trade candidate".to_string());
                reasons.push(format!(
                    "mcap {:.0} in entry window {:.0}-{:.0}",
                    mcap, plan.entry_mcap_min, plan.entry_mcap_max
                ));
                reasons.push(format!(
                    "rsi {:.1} in entry band and rising",
                    rsi.unwrap_or(0.0)
                ));
            } else {
                reasons.push(REASON_WAITING_ENTRY.to_string());
            }
        } else {
            reasons.push(REASON_NOT_CANDIDATE.to_string());
        }

        if health.eligible && candles.is_none() {
            reasons.push(REASON_CANDLES_UNAVAILABLE.to_string());
        }

        Decision {
            intent,
            reasons,
            health: health.clone(),
            signals: SignalSnapshot {
                mcap,
                rsi,
                rsi_slope: slope,
                swing_low,
                swing_high,
            },
            plan,
            advisory: None,
            config_version: settings.app.config_version,
        }
    }
}
