//! Append-only event log collaborator.
//!
//! The engine treats the log as fire-and-forget: a sink that cannot accept
//! an event must never fail the evaluation that produced it.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn append(&self, kind: &str, payload: Value);
}

/// Default sink: structured log lines, picked up by whatever aggregates
/// stdout in the deployment.
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn append(&self, kind: &str, payload: Value) {
        info!(kind = kind, payload = %payload, "event");
    }
}

/// In-memory sink for tests.
#[derive(Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<(String, Value)>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<(String, Value)> {
        self.events.lock().expect("event sink lock").clone()
    }

    pub fn kinds(&self) -> Vec<String> {
        self.recorded().into_iter().map(|(kind, _)| kind).collect()
    }
}

#[async_trait]
impl EventSink for MemoryEventSink {
    async fn append(&self, kind: &str, payload: Value) {
        self.events
            .lock()
            .expect("event sink lock")
            .push((kind.to_string(), payload));
    }
}
