//! Raw feed items and the canonical coin record they normalize into.

use serde::{Deserialize, Serialize};

/// A numeric field as the feed actually sends it: sometimes a JSON number,
/// sometimes a decimal string. Parsing happens in the normalizer, never in
/// serde, so one malformed field can never reject a whole listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNum {
    Num(f64),
    Text(String),
}

impl LooseNum {
    /// Finite value or nothing. Unparsable strings and NaN/∞ are absent.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            LooseNum::Num(n) => *n,
            LooseNum::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Only accepts an actual JSON number. Used for fields where the feed
    /// contract promises a number and a string means garbage.
    pub fn as_number_only(&self) -> Option<f64> {
        match self {
            LooseNum::Num(n) => n.is_finite().then_some(*n),
            LooseNum::Text(_) => None,
        }
    }
}

/// One row of the venue's listing feed, as received. Every field the engine
/// reads is optional or loosely typed; shape drift degrades a single field,
/// not the item.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawListingItem {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default)]
    pub attributes: RawListingAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawListingAttributes {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "tokenAddress", default)]
    pub token_address: String,
    /// Pool address.
    #[serde(default)]
    pub address: String,
    /// Market cap (fully diluted), USD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fdv: Option<LooseNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cur_liq: Option<RawLiquidity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<LooseNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buys_count: Option<LooseNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sells_count: Option<LooseNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_timestamp: Option<LooseNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit: Option<RawAudit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holders_count: Option<LooseNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_holding_perc: Option<LooseNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insiders_holding_perc: Option<LooseNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snipers_holding_perc: Option<LooseNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fresh_holding_perc: Option<LooseNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_holding_perc: Option<LooseNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fresh_holders_count: Option<LooseNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_holders_count: Option<LooseNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pump_pool_id: Option<LooseNum>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawLiquidity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usd: Option<LooseNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<LooseNum>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawAudit {
    #[serde(default)]
    pub mint_authority: bool,
    #[serde(default)]
    pub freeze_authority: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lp_burned_perc: Option<LooseNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_holders_perc: Option<LooseNum>,
}

/// Canonical coin record every evaluation runs against. Built fresh per
/// normalization call, immutable afterwards.
///
/// Economic counters default to zero when the feed omits them; holder and
/// audit percentages stay `None` instead, because a missing holder statistic
/// must never read as "zero risk" in the scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub token_address: String,
    pub pool_address: String,
    pub mcap: f64,
    pub liquidity_usd: f64,
    pub volume: f64,
    pub buys: f64,
    pub sells: f64,
    /// Unix seconds; zero when the feed did not report a creation time.
    pub created_timestamp: i64,
    pub audit: CoinAudit,
    pub holders: CoinHolders,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CoinAudit {
    pub mint_authority: bool,
    pub freeze_authority: bool,
    pub lp_burned_perc: Option<f64>,
    pub top_holders_perc: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CoinHolders {
    pub holders_count: Option<f64>,
    pub dev_hold_perc: Option<f64>,
    pub insiders_hold_perc: Option<f64>,
    pub snipers_hold_perc: Option<f64>,
    pub fresh_hold_perc: Option<f64>,
    pub bundle_hold_perc: Option<f64>,
    pub bundle_holders_count: Option<f64>,
}
