//! Decision, advisory verdict, and execution-facing records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::score::ScoreResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeMode {
    Paper,
    Live,
}

/// Technical readings at decision time. Absent values mean the series was
/// too short or the candle collaborator was unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSnapshot {
    pub mcap: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi_slope: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swing_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swing_high: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSnapshot {
    pub entry_mcap_min: f64,
    pub entry_mcap_max: f64,
    /// Informational; position management happens downstream.
    pub target_mcap: f64,
    pub stop_mcap: f64,
}

/// Structured verdict parsed from an advisory worker. Unknown intents
/// coerce to hold so a confused worker can never push the engine toward
/// more risk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub intent: Intent,
    pub confidence: f64,
    pub rationale: Vec<String>,
    pub risks: Vec<String>,
    pub invalidations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    /// Key of the worker that produced the verdict.
    pub worker: String,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub intent: Intent,
    pub reasons: Vec<String>,
    pub health: ScoreResult,
    pub signals: SignalSnapshot,
    pub plan: PlanSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<Advisory>,
    /// Settings revision active at evaluation time.
    pub config_version: u32,
}

/// A fully assembled evaluation record, as appended to the event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    pub thought_id: String,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub decision: Decision,
}

/// Execution-facing summary of a Thought. Not a source of truth for
/// position state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub proposal_id: String,
    pub thought_id: String,
    pub action: Intent,
    pub mode: TradeMode,
    pub may_execute: bool,
}
