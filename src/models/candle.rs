//! OHLCV candle bar.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    /// Unix seconds, ascending within a series.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Close prices with non-finite bars dropped, ready for the oscillator.
pub fn finite_closes(candles: &[Candle]) -> Vec<f64> {
    candles
        .iter()
        .map(|c| c.close)
        .filter(|c| c.is_finite())
        .collect()
}
