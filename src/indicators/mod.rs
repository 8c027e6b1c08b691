//! Technical indicators. Pure functions over candle/close series.

pub mod momentum;
pub mod structure;

pub use momentum::rsi::{compute_rsi, rsi_slope};
pub use structure::swing::{swing_bars, swing_range};
