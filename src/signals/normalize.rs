//! Normalization of raw feed items into the canonical coin record.

use crate::models::coin::{CanonicalCoin, CoinAudit, CoinHolders, LooseNum, RawListingItem};

fn num(value: &Option<LooseNum>) -> Option<f64> {
    value.as_ref().and_then(LooseNum::as_f64)
}

fn num_or_zero(value: &Option<LooseNum>) -> f64 {
    num(value).unwrap_or(0.0)
}

/// Total function: every raw item yields a canonical coin, whatever shape
/// the feed sent.
///
/// Economic counters (mcap, liquidity, volume, buys/sells, creation time)
/// default to zero when absent; holder and audit percentages stay `None`.
/// The scorer relies on that distinction: only present values can trigger
/// holder gates or penalties.
pub fn normalize(item: &RawListingItem) -> CanonicalCoin {
    let a = &item.attributes;

    let audit = match &a.audit {
        Some(raw) => CoinAudit {
            mint_authority: raw.mint_authority,
            freeze_authority: raw.freeze_authority,
            // The feed contract promises a number here; a string is garbage,
            // not data, and stays absent.
            lp_burned_perc: raw.lp_burned_perc.as_ref().and_then(LooseNum::as_number_only),
            top_holders_perc: num(&raw.top_holders_perc),
        },
        None => CoinAudit::default(),
    };

    CanonicalCoin {
        id: item.id.clone(),
        symbol: a.symbol.clone(),
        name: a.name.clone(),
        token_address: a.token_address.clone(),
        pool_address: a.address.clone(),
        mcap: num_or_zero(&a.fdv),
        liquidity_usd: a
            .cur_liq
            .as_ref()
            .and_then(|liq| num(&liq.usd))
            .unwrap_or(0.0),
        volume: num_or_zero(&a.volume),
        buys: num_or_zero(&a.buys_count),
        sells: num_or_zero(&a.sells_count),
        created_timestamp: num(&a.created_timestamp).unwrap_or(0.0) as i64,
        audit,
        holders: CoinHolders {
            holders_count: num(&a.holders_count),
            dev_hold_perc: num(&a.dev_holding_perc),
            insiders_hold_perc: num(&a.insiders_holding_perc),
            snipers_hold_perc: num(&a.snipers_holding_perc),
            fresh_hold_perc: num(&a.fresh_holding_perc),
            bundle_hold_perc: num(&a.bundle_holding_perc),
            bundle_holders_count: num(&a.bundle_holders_count),
        },
    }
}
