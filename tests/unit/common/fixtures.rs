//! Shared builders for unit tests.

#![allow(dead_code)]

use memetrix::config::Settings;
use memetrix::models::candle::Candle;
use memetrix::models::coin::{CanonicalCoin, CoinAudit, CoinHolders};

/// Fixed evaluation clock so age math stays deterministic.
pub const NOW: i64 = 1_700_000_000;

pub fn settings() -> Settings {
    Settings::default()
}

/// A coin that clears every default gate with score 100: liquidity well
/// above the 10k soft floor, healthy ratios, calm holder stats.
pub fn healthy_coin() -> CanonicalCoin {
    CanonicalCoin {
        id: "8711".to_string(),
        symbol: "MEME".to_string(),
        name: "Meme Coin".to_string(),
        token_address: "TokenAddr1111111111111111111111".to_string(),
        pool_address: "PoolAddr11111111111111111111111".to_string(),
        mcap: 20_000.0,
        liquidity_usd: 12_000.0,
        volume: 50_000.0,
        buys: 100.0,
        sells: 80.0,
        created_timestamp: NOW - 3_600,
        audit: CoinAudit {
            mint_authority: false,
            freeze_authority: false,
            lp_burned_perc: Some(95.0),
            top_holders_perc: Some(20.0),
        },
        holders: CoinHolders {
            holders_count: Some(400.0),
            dev_hold_perc: Some(2.0),
            insiders_hold_perc: Some(1.0),
            snipers_hold_perc: Some(3.0),
            fresh_hold_perc: Some(10.0),
            bundle_hold_perc: Some(5.0),
            bundle_holders_count: Some(40.0),
        },
    }
}

pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            Candle::new(i as i64 * 60, close, close + 0.5, close - 0.5, close, 1_000.0)
        })
        .collect()
}

/// Close series whose trailing RSI(14) sits in the default entry band
/// (~26.5) and is rising: ten unit drops followed by nine small gains.
pub fn entry_ready_closes() -> Vec<f64> {
    let mut closes = vec![100.0];
    for _ in 0..10 {
        closes.push(closes.last().copied().unwrap_or(0.0) - 1.0);
    }
    for _ in 0..9 {
        closes.push(closes.last().copied().unwrap_or(0.0) + 0.2);
    }
    closes
}

/// Close series whose trailing RSI(14) is in the entry band (~37.5) but
/// falling: twelve small gains followed by seven larger drops.
pub fn entry_fading_closes() -> Vec<f64> {
    let mut closes = vec![100.0];
    for _ in 0..12 {
        closes.push(closes.last().copied().unwrap_or(0.0) + 0.3);
    }
    for _ in 0..7 {
        closes.push(closes.last().copied().unwrap_or(0.0) - 0.5);
    }
    closes
}
