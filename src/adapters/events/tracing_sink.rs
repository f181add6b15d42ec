//! Mirrors agent events into the `tracing` log.

use crate::domain::agent::{AgentEvent, AgentEventType};
use crate::ports::EventSink;

/// Logs each event at a level matching its significance.
///
/// Errors go out at `error`, rejections and nudges at `warn`, run
/// boundaries and accepted decisions at `info`, everything else at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn on_event(&self, event: &AgentEvent) {
        let run_id = event.run_id.to_string();
        let kind = event.event_type.as_str();
        let iteration = event.iteration.unwrap_or(0);
        let data = serde_json::Value::Object(event.data.clone());

        match event.event_type {
            AgentEventType::Error => tracing::error!(
                run_id = %run_id,
                sequence = event.sequence,
                iteration,
                data = %data,
                "agent event: {}",
                kind
            ),
            AgentEventType::DecisionRejected | AgentEventType::Nudge => tracing::warn!(
                run_id = %run_id,
                sequence = event.sequence,
                iteration,
                data = %data,
                "agent event: {}",
                kind
            ),
            AgentEventType::Start
            | AgentEventType::DecisionAccepted
            | AgentEventType::Cancelled
            | AgentEventType::Complete => tracing::info!(
                run_id = %run_id,
                sequence = event.sequence,
                iteration,
                data = %data,
                "agent event: {}",
                kind
            ),
            _ => tracing::debug!(
                run_id = %run_id,
                sequence = event.sequence,
                iteration,
                data = %data,
                "agent event: {}",
                kind
            ),
        }
    }
}
