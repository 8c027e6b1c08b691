//! Gate-then-score health evaluation.
//!
//! Stage one walks the hard gates in a fixed order; any hit makes the coin
//! ineligible and forces tier `Rejected`. Stage two starts at 100 and
//! applies independent penalties, so a coin can both hard-fail and carry a
//! meaningful score for the dashboard.

use crate::config::Settings;
use crate::models::coin::CanonicalCoin;
use crate::models::score::{ComputedRatios, ScoreResult, Tier};

pub const FAIL_MINT_AUTHORITY: &str = "mint_authority_true";
pub const FAIL_FREEZE_AUTHORITY: &str = "freeze_authority_true";
pub const FAIL_LP_BURNED: &str = "lp_burned_below_min";
pub const FAIL_LIQUIDITY: &str = "liquidity_below_min";
pub const FAIL_MCAP: &str = "mcap_below_min";
pub const FAIL_LIQ_RATIO: &str = "liq_ratio_below_min";
pub const FAIL_DEV_HOLD: &str = "dev_hold_above_max";
pub const FAIL_SNIPERS_HOLD: &str = "snipers_hold_above_max";
pub const FAIL_INSIDERS_HOLD: &str = "insiders_hold_above_max";

pub const REASON_MCAP_ABOVE_RANGE: &str = "mcap_above_preferred_range";
pub const REASON_THIN_LIQ_RATIO: &str = "thin_liquidity_ratio";
pub const REASON_SELL_PRESSURE: &str = "sell_pressure";
pub const REASON_TOP_HOLDERS: &str = "top_holders_concentration";

/// Evaluate a canonical coin against the configured health thresholds.
pub fn evaluate(settings: &Settings, coin: &CanonicalCoin, now_secs: i64) -> ScoreResult {
    let healthy = &settings.healthy;
    let mut hard_fails: Vec<String> = Vec::new();
    let mut reasons: Vec<String> = Vec::new();

    let age_secs = (now_secs - coin.created_timestamp).max(0);
    let liq_ratio = if coin.mcap > 0.0 {
        coin.liquidity_usd / coin.mcap
    } else {
        0.0
    };
    let sell_ratio = if coin.buys > 0.0 {
        coin.sells / coin.buys
    } else {
        coin.sells
    };

    // Hard gates, in check order.
    if healthy.audit.require_mint_authority_false && coin.audit.mint_authority {
        hard_fails.push(FAIL_MINT_AUTHORITY.to_string());
    }
    if healthy.audit.require_freeze_authority_false && coin.audit.freeze_authority {
        hard_fails.push(FAIL_FREEZE_AUTHORITY.to_string());
    }
    if let Some(lp_burned) = coin.audit.lp_burned_perc {
        if lp_burned < healthy.audit.min_lp_burned_perc_if_present {
            hard_fails.push(FAIL_LP_BURNED.to_string());
        }
    }

    if coin.liquidity_usd < healthy.min_liquidity_usd {
        hard_fails.push(FAIL_LIQUIDITY.to_string());
    }
    if coin.mcap < healthy.min_market_cap_usd {
        hard_fails.push(FAIL_MCAP.to_string());
    }
    if let Some(max_mcap) = healthy.max_market_cap_usd {
        // Not a hard fail; keep monitorable but score penalty.
        if coin.mcap > max_mcap {
            reasons.push(REASON_MCAP_ABOVE_RANGE.to_string());
        }
    }

    if liq_ratio < healthy.min_liq_ratio {
        hard_fails.push(FAIL_LIQ_RATIO.to_string());
    }

    let dev = coin.holders.dev_hold_perc;
    if dev.is_some_and(|v| v > healthy.holders.max_dev_hold_perc) {
        hard_fails.push(FAIL_DEV_HOLD.to_string());
    }
    let snipers = coin.holders.snipers_hold_perc;
    if snipers.is_some_and(|v| v > healthy.holders.max_snipers_hold_perc) {
        hard_fails.push(FAIL_SNIPERS_HOLD.to_string());
    }
    let insiders = coin.holders.insiders_hold_perc;
    if insiders.is_some_and(|v| v > healthy.holders.max_insiders_hold_perc) {
        hard_fails.push(FAIL_INSIDERS_HOLD.to_string());
    }

    let eligible = hard_fails.is_empty();

    // Score: penalties stack unless noted otherwise.
    let mut score: i64 = 100;

    if coin
        .audit
        .lp_burned_perc
        .is_some_and(|v| v < healthy.audit.warn_lp_burned_perc)
    {
        score -= 10;
    }

    if coin.liquidity_usd < healthy.min_liquidity_usd.max(10_000.0) {
        score -= 10;
    }
    // Exclusive bands: only the tighter one applies.
    if liq_ratio < healthy.warn_liq_ratio {
        score -= 12;
    } else if liq_ratio < 0.05 {
        score -= 6;
    }

    if coin.mcap >= healthy.min_market_cap_usd && coin.mcap <= healthy.min_market_cap_usd * 1.5 {
        score -= 4;
    }
    if healthy.max_market_cap_usd.is_some_and(|max| coin.mcap > max) {
        score -= 6;
    }

    // Flow: warn and fail penalties are cumulative.
    if sell_ratio > healthy.flow.sell_ratio_warn {
        score -= 6;
    }
    if sell_ratio > healthy.flow.sell_ratio_fail {
        score -= 12;
    }

    if dev.is_some_and(|v| v >= healthy.holders.warn_dev_hold_perc) {
        score -= 8;
    }
    if snipers.is_some_and(|v| v >= healthy.holders.warn_snipers_hold_perc) {
        score -= 6;
    }
    if insiders.is_some_and(|v| v >= healthy.holders.warn_insiders_hold_perc) {
        score -= 6;
    }

    if let (Some(holders_count), Some(bundle_count)) = (
        coin.holders.holders_count,
        coin.holders.bundle_holders_count,
    ) {
        let bundle_ratio = bundle_count / holders_count.max(1.0);
        if bundle_ratio > healthy.holders.bundle_ratio_fail {
            score -= 12;
        } else if bundle_ratio > healthy.holders.bundle_ratio_warn {
            score -= 6;
        }
    }

    let score = score.clamp(0, 100);

    if !eligible {
        reasons.extend(hard_fails.iter().cloned());
    }
    if liq_ratio < 0.03 {
        reasons.push(REASON_THIN_LIQ_RATIO.to_string());
    }
    if sell_ratio > 1.15 {
        reasons.push(REASON_SELL_PRESSURE.to_string());
    }
    if coin.audit.top_holders_perc.is_some_and(|v| v > 35.0) {
        reasons.push(REASON_TOP_HOLDERS.to_string());
    }

    let tier = if eligible {
        let cuts = &settings.scoring;
        let score_f = score as f64;
        if score_f >= cuts.trade_candidate {
            Tier::TradeCandidate
        } else if score_f >= cuts.monitor {
            Tier::Monitor
        } else if score_f >= cuts.watch {
            Tier::Watch
        } else {
            // Floor behavior: an eligible coin never ranks below Watch.
            Tier::Watch
        }
    } else {
        Tier::Rejected
    };

    ScoreResult {
        eligible,
        hard_fails,
        score,
        tier,
        reasons,
        computed: ComputedRatios {
            age_secs,
            liq_ratio,
            sell_ratio,
        },
    }
}
