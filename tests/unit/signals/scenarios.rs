//! End-to-end evaluation scenarios over the pure core.

use crate::common_fixtures::{
    candles_from_closes, entry_fading_closes, entry_ready_closes, healthy_coin, settings, NOW,
};
use memetrix::indicators::compute_rsi;
use memetrix::models::decision::Intent;
use memetrix::models::score::Tier;
use memetrix::signals::{evaluate, DecisionEngine};

/// Scenario A: liquidity 5000 against a 7500 floor.
#[test]
fn scenario_a_liquidity_gate() {
    let mut coin = healthy_coin();
    coin.liquidity_usd = 5_000.0;

    let result = evaluate(&settings(), &coin, NOW);
    assert!(!result.eligible);
    assert!(result.hard_fails.iter().any(|f| f == "liquidity_below_min"));
    assert_eq!(result.tier, Tier::Rejected);
}

/// Scenario B: clean trade candidate, mcap in the entry window, RSI in the
/// entry band and rising.
#[test]
fn scenario_b_entry_fires() {
    let settings = settings();
    let coin = healthy_coin();
    let health = evaluate(&settings, &coin, NOW);
    assert_eq!(health.tier, Tier::TradeCandidate);
    assert!(coin.mcap >= 18_000.0 && coin.mcap <= 24_000.0);

    let closes = entry_ready_closes();
    let rsi = compute_rsi(&closes, settings.rsi.length).unwrap();
    assert!(
        rsi >= settings.rsi.entry_rsi_min && rsi <= settings.rsi.entry_rsi_max,
        "fixture drifted out of the entry band: {rsi}"
    );

    let candles = candles_from_closes(&closes);
    let decision = DecisionEngine::decide(&settings, &coin, &health, Some(&candles));
    assert_eq!(decision.intent, Intent::Buy);
    assert!(decision.signals.rsi_slope.unwrap() > 0.0);
}

/// Scenario C: same coin, RSI still in the band but falling.
#[test]
fn scenario_c_falling_slope_waits() {
    let settings = settings();
    let coin = healthy_coin();
    let health = evaluate(&settings, &coin, NOW);

    let closes = entry_fading_closes();
    let rsi = compute_rsi(&closes, settings.rsi.length).unwrap();
    assert!(
        rsi >= settings.rsi.entry_rsi_min && rsi <= settings.rsi.entry_rsi_max,
        "fixture drifted out of the entry band: {rsi}"
    );

    let candles = candles_from_closes(&closes);
    let decision = DecisionEngine::decide(&settings, &coin, &health, Some(&candles));
    assert_eq!(decision.intent, Intent::Hold);
    assert!(decision.signals.rsi_slope.unwrap() < 0.0);
    assert!(decision
        .reasons
        .iter()
        .any(|r| r == "trade candidate but waiting for entry conditions"));
}

/// Scenario D: strictly increasing closes saturate the oscillator at 100.
#[test]
fn scenario_d_no_losses_saturates_oscillator() {
    let closes: Vec<f64> = (0..=14).map(|i| 50.0 + i as f64).collect();
    assert_eq!(compute_rsi(&closes, 14), Some(100.0));
}
