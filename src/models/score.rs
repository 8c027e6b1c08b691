//! Health evaluation result types.

use serde::{Deserialize, Serialize};

/// Coarse eligibility/quality bucket. `Rejected` is reserved for hard-gate
/// failures; eligible coins never rank below `Watch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Rejected,
    Watch,
    Monitor,
    TradeCandidate,
}

/// Metrics derived during evaluation, surfaced for the dashboard and the
/// advisory pack. Recomputed every evaluation, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedRatios {
    pub age_secs: i64,
    pub liq_ratio: f64,
    pub sell_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// True iff no hard gate triggered.
    pub eligible: bool,
    /// Named fail tags in check order.
    pub hard_fails: Vec<String>,
    /// Health score after clamping to [0, 100].
    pub score: i64,
    pub tier: Tier,
    /// Hard-fail tags (when ineligible) plus advisory warn tags.
    pub reasons: Vec<String>,
    pub computed: ComputedRatios,
}
