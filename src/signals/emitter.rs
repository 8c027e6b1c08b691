//! Record emitter: packages a Decision into a Thought and a Proposal and
//! hands the thought to the event log. Pure assembly, no business logic.

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::config::Settings;
use crate::events::EventSink;
use crate::models::decision::{Decision, Proposal, Thought, TradeMode};

pub struct RecordEmitter;

impl RecordEmitter {
    /// Assemble the audit records for one evaluation and append the thought
    /// to the sink.
    pub async fn emit(
        decision: Decision,
        settings: &Settings,
        sink: &dyn EventSink,
    ) -> (Thought, Proposal) {
        let thought = Thought {
            thought_id: Uuid::new_v4().to_string(),
            ts: Utc::now(),
            decision,
        };

        let proposal = Proposal {
            proposal_id: Uuid::new_v4().to_string(),
            thought_id: thought.thought_id.clone(),
            action: thought.decision.intent,
            mode: settings.app.mode,
            may_execute: may_execute(settings),
        };

        match serde_json::to_value(&thought) {
            Ok(payload) => sink.append("thought", payload).await,
            Err(e) => warn!(error = %e, "failed to serialize thought for event log"),
        }

        (thought, proposal)
    }
}

/// Auto-execution gate: paper mode is always allowed through, live mode
/// additionally needs the explicit live-trading switch.
pub fn may_execute(settings: &Settings) -> bool {
    settings.app.auto_execute
        && (settings.app.mode == TradeMode::Paper || settings.app.enable_live_trading)
}
