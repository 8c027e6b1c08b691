//! Unit tests for the decision engine.

use crate::common_fixtures::{
    candles_from_closes, entry_ready_closes, healthy_coin, settings, NOW,
};
use memetrix::models::decision::Intent;
use memetrix::signals::{evaluate, DecisionEngine};

#[test]
fn ineligible_coin_holds_without_signals() {
    let settings = settings();
    let mut coin = healthy_coin();
    coin.liquidity_usd = 1_000.0;
    let health = evaluate(&settings, &coin, NOW);

    let decision = DecisionEngine::decide(&settings, &coin, &health, None);
    assert_eq!(decision.intent, Intent::Hold);
    assert!(decision.reasons.iter().any(|r| r == "not a trade candidate"));
    assert_eq!(decision.signals.rsi, None);
    // Candles were never owed to an ineligible coin; no degradation note.
    assert!(!decision.reasons.iter().any(|r| r == "candles unavailable"));
}

#[test]
fn eligible_coin_without_candles_degrades_explicitly() {
    let settings = settings();
    let coin = healthy_coin();
    let health = evaluate(&settings, &coin, NOW);

    let decision = DecisionEngine::decide(&settings, &coin, &health, None);
    assert_eq!(decision.intent, Intent::Hold);
    assert!(decision.reasons.iter().any(|r| r == "candles unavailable"));
}

#[test]
fn candidate_outside_entry_window_waits() {
    let settings = settings();
    let mut coin = healthy_coin();
    coin.mcap = 30_000.0; // above the 18k-24k entry window
    coin.liquidity_usd = 15_000.0;
    let health = evaluate(&settings, &coin, NOW);
    assert!(health.eligible);

    let candles = candles_from_closes(&entry_ready_closes());
    let decision = DecisionEngine::decide(&settings, &coin, &health, Some(&candles));
    assert_eq!(decision.intent, Intent::Hold);
    assert!(decision
        .reasons
        .iter()
        .any(|r| r == "trade candidate but waiting for entry conditions"));
}

#[test]
fn short_series_means_no_rsi_and_no_entry() {
    let settings = settings();
    let coin = healthy_coin();
    let health = evaluate(&settings, &coin, NOW);

    // Ten bars: below length+1, the oscillator is absent and absence never
    // passes the entry condition.
    let candles = candles_from_closes(&[100.0, 99.0, 98.0, 97.0, 96.0, 95.0, 94.0, 93.0, 92.0, 91.0]);
    let decision = DecisionEngine::decide(&settings, &coin, &health, Some(&candles));
    assert_eq!(decision.signals.rsi, None);
    assert_eq!(decision.intent, Intent::Hold);
}

#[test]
fn plan_snapshot_uses_configured_multipliers() {
    let settings = settings();
    let coin = healthy_coin();
    let health = evaluate(&settings, &coin, NOW);

    let decision = DecisionEngine::decide(&settings, &coin, &health, None);
    assert_eq!(decision.plan.target_mcap, 20_000.0 * 1.70);
    assert_eq!(decision.plan.stop_mcap, 20_000.0 * 0.75);
    assert_eq!(decision.config_version, settings.app.config_version);
}

#[test]
fn swing_extremes_are_reported_with_the_entry() {
    let settings = settings();
    let coin = healthy_coin();
    let health = evaluate(&settings, &coin, NOW);

    let candles = candles_from_closes(&entry_ready_closes());
    let decision = DecisionEngine::decide(&settings, &coin, &health, Some(&candles));
    // Builder spreads low/high ±0.5 around each close.
    let swing_low = decision.signals.swing_low.unwrap();
    let swing_high = decision.signals.swing_high.unwrap();
    assert!(swing_low < swing_high);
    assert!(swing_low <= 90.0 - 0.5 + 1e-9);
}
