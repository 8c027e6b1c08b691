//! Swing low/high over a trailing bar window.

use crate::models::candle::Candle;

/// Number of trailing bars the swing window covers for a given lookback.
pub fn swing_bars(bars_lookback: usize) -> usize {
    (bars_lookback / 4).clamp(5, 30)
}

/// (min low, max high) over the trailing swing window.
///
/// Returns `None` on an empty slice; the infinity fold sentinels never
/// escape this function.
pub fn swing_range(candles: &[Candle], bars_lookback: usize) -> Option<(f64, f64)> {
    let bars = swing_bars(bars_lookback);
    let recent = &candles[candles.len().saturating_sub(bars)..];
    if recent.is_empty() {
        return None;
    }

    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    for candle in recent {
        if candle.low.is_finite() {
            low = low.min(candle.low);
        }
        if candle.high.is_finite() {
            high = high.max(candle.high);
        }
    }

    (low.is_finite() && high.is_finite()).then_some((low, high))
}
