//! RSI (Relative Strength Index) indicator
//!
//! RSI = 100 - (100 / (1 + RS))
//! RS = Average Gain / Average Loss

/// RSI over the trailing `length` deltas of a close series.
///
/// Returns `None` when fewer than `length + 1` closes are available or the
/// result is non-finite. A window with no losses returns exactly 100.
pub fn compute_rsi(closes: &[f64], length: usize) -> Option<f64> {
    if length == 0 || closes.len() < length + 1 {
        return None;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in closes.len() - length..closes.len() {
        let delta = closes[i] - closes[i - 1];
        if delta >= 0.0 {
            gains += delta;
        } else {
            losses -= delta;
        }
    }

    let avg_gain = gains / length as f64;
    let avg_loss = losses / length as f64;
    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - (100.0 / (1.0 + rs));
    rsi.is_finite().then_some(rsi)
}

/// RSI slope: last minus first of the RSI recomputed at each prefix ending
/// within the trailing `window + 1` positions.
///
/// O(window * length) on purpose; window is small (≤ 30) and the series is
/// bounded by the configured lookback, so a streaming variant buys nothing.
/// Returns `None` when the series is too short or any prefix RSI is absent.
pub fn rsi_slope(closes: &[f64], length: usize, window: usize) -> Option<f64> {
    if closes.len() < length + window + 1 {
        return None;
    }

    let mut first = None;
    let mut last = None;
    for end in closes.len() - window..=closes.len() {
        let value = compute_rsi(&closes[..end], length)?;
        if first.is_none() {
            first = Some(value);
        }
        last = Some(value);
    }
    Some(last? - first?)
}
