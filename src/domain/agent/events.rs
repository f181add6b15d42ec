//! Structured progress events emitted during a run.
//!
//! Every event has the same envelope (`run_id`, `sequence`, `type`,
//! `timestamp`, optional `iteration`, free-form `data`) so that sinks can
//! store or forward them without knowing each payload. Payloads are built
//! from the typed [`AgentEventKind`] so the orchestrator cannot emit a
//! malformed one.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{AgentDecision, RunStatus};
use crate::domain::foundation::{Confidence, RunId, Timestamp};
use crate::domain::tools::ToolResult;

/// Discriminant of an [`AgentEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentEventType {
    Start,
    IterationStart,
    Thinking,
    ToolCallStart,
    ToolCallResult,
    DecisionRejected,
    DecisionAccepted,
    Nudge,
    Error,
    Cancelled,
    Complete,
}

impl AgentEventType {
    /// Exactly one terminal event closes every run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AgentEventType::Complete | AgentEventType::Error | AgentEventType::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentEventType::Start => "start",
            AgentEventType::IterationStart => "iteration_start",
            AgentEventType::Thinking => "thinking",
            AgentEventType::ToolCallStart => "tool_call_start",
            AgentEventType::ToolCallResult => "tool_call_result",
            AgentEventType::DecisionRejected => "decision_rejected",
            AgentEventType::DecisionAccepted => "decision_accepted",
            AgentEventType::Nudge => "nudge",
            AgentEventType::Error => "error",
            AgentEventType::Cancelled => "cancelled",
            AgentEventType::Complete => "complete",
        }
    }
}

/// Typed payload for each event type.
#[derive(Debug, Clone)]
pub enum AgentEventKind {
    Start {
        input: String,
        variant: String,
        max_iterations: u32,
        threshold: Confidence,
    },
    IterationStart,
    Thinking {
        text: String,
    },
    ToolCallStart {
        tool_use_id: String,
        tool: String,
        input: Map<String, Value>,
    },
    ToolCallResult {
        tool_use_id: String,
        tool: String,
        result: ToolResult,
    },
    DecisionRejected {
        confidence: Confidence,
        threshold: Confidence,
    },
    DecisionAccepted {
        decision: AgentDecision,
    },
    Nudge {
        message: String,
    },
    Error {
        message: String,
    },
    Cancelled,
    Complete {
        status: RunStatus,
        decision: Option<AgentDecision>,
    },
}

impl AgentEventKind {
    pub fn event_type(&self) -> AgentEventType {
        match self {
            AgentEventKind::Start { .. } => AgentEventType::Start,
            AgentEventKind::IterationStart => AgentEventType::IterationStart,
            AgentEventKind::Thinking { .. } => AgentEventType::Thinking,
            AgentEventKind::ToolCallStart { .. } => AgentEventType::ToolCallStart,
            AgentEventKind::ToolCallResult { .. } => AgentEventType::ToolCallResult,
            AgentEventKind::DecisionRejected { .. } => AgentEventType::DecisionRejected,
            AgentEventKind::DecisionAccepted { .. } => AgentEventType::DecisionAccepted,
            AgentEventKind::Nudge { .. } => AgentEventType::Nudge,
            AgentEventKind::Error { .. } => AgentEventType::Error,
            AgentEventKind::Cancelled => AgentEventType::Cancelled,
            AgentEventKind::Complete { .. } => AgentEventType::Complete,
        }
    }

    fn into_data(self) -> Map<String, Value> {
        let value = match self {
            AgentEventKind::Start {
                input,
                variant,
                max_iterations,
                threshold,
            } => json!({
                "input": input,
                "variant": variant,
                "max_iterations": max_iterations,
                "threshold": threshold.value(),
            }),
            AgentEventKind::IterationStart | AgentEventKind::Cancelled => json!({}),
            AgentEventKind::Thinking { text } => json!({ "text": text }),
            AgentEventKind::ToolCallStart {
                tool_use_id,
                tool,
                input,
            } => json!({ "tool_use_id": tool_use_id, "tool": tool, "input": input }),
            AgentEventKind::ToolCallResult {
                tool_use_id,
                tool,
                result,
            } => json!({
                "tool_use_id": tool_use_id,
                "tool": tool,
                "success": result.success,
                "summary": result.summary,
                "result": result,
            }),
            AgentEventKind::DecisionRejected {
                confidence,
                threshold,
            } => json!({ "confidence": confidence.value(), "threshold": threshold.value() }),
            AgentEventKind::DecisionAccepted { decision } => json!({ "decision": decision }),
            AgentEventKind::Nudge { message } => json!({ "message": message }),
            AgentEventKind::Error { message } => json!({ "message": message }),
            AgentEventKind::Complete { status, decision } => {
                json!({ "status": status, "decision": decision })
            }
        };

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// One entry in a run's ordered event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEvent {
    pub run_id: RunId,
    /// Position within the run, starting at 0.
    pub sequence: u64,
    #[serde(rename = "type")]
    pub event_type: AgentEventType,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration: Option<u32>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl AgentEvent {
    pub fn new(run_id: RunId, sequence: u64, iteration: Option<u32>, kind: AgentEventKind) -> Self {
        Self {
            run_id,
            sequence,
            event_type: kind.event_type(),
            timestamp: Timestamp::now(),
            iteration,
            data: kind.into_data(),
        }
    }

    /// Reads a payload field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}
