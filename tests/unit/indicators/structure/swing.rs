//! Unit tests for the swing low/high window.

use memetrix::indicators::{swing_bars, swing_range};
use memetrix::models::candle::Candle;

fn bars(lows_highs: &[(f64, f64)]) -> Vec<Candle> {
    lows_highs
        .iter()
        .enumerate()
        .map(|(i, &(low, high))| Candle::new(i as i64, low, high, low, (low + high) / 2.0, 0.0))
        .collect()
}

#[test]
fn window_is_quarter_of_lookback_clamped() {
    assert_eq!(swing_bars(240), 30);
    assert_eq!(swing_bars(120), 30);
    assert_eq!(swing_bars(80), 20);
    assert_eq!(swing_bars(8), 5);
    assert_eq!(swing_bars(0), 5);
}

#[test]
fn empty_series_has_no_swing() {
    assert_eq!(swing_range(&[], 240), None);
}

#[test]
fn extremes_over_trailing_window() {
    let candles = bars(&[(10.0, 20.0), (8.0, 15.0), (9.0, 30.0), (11.0, 12.0)]);
    // Lookback 20 → 5-bar window covers the whole 4-bar series.
    let (low, high) = swing_range(&candles, 20).unwrap();
    assert_eq!(low, 8.0);
    assert_eq!(high, 30.0);
}

#[test]
fn bars_outside_the_window_are_ignored() {
    // 40 bars, lookback 40 → 10-bar window; the early extreme must not leak.
    let mut series: Vec<(f64, f64)> = vec![(1.0, 100.0)];
    series.extend(std::iter::repeat((10.0, 20.0)).take(39));
    let candles = bars(&series);

    let (low, high) = swing_range(&candles, 40).unwrap();
    assert_eq!(low, 10.0);
    assert_eq!(high, 20.0);
}

#[test]
fn non_finite_bars_are_skipped() {
    let mut candles = bars(&[(10.0, 20.0), (9.0, 25.0)]);
    candles.push(Candle::new(2, f64::NAN, f64::NAN, f64::NAN, 15.0, 0.0));

    let (low, high) = swing_range(&candles, 20).unwrap();
    assert_eq!(low, 9.0);
    assert_eq!(high, 25.0);
}
