//! Outcome of a finished run.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::AgentDecision;
use crate::domain::foundation::{RunId, Timestamp};
use crate::ports::TokenUsage;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// A decision passed the confidence gate.
    Decided,
    /// The iteration budget ran out without an accepted decision.
    MaxIterations,
    /// Cancellation was observed at an iteration boundary.
    Cancelled,
    /// Transport error or truncated model output.
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Decided => "decided",
            RunStatus::MaxIterations => "max_iterations",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Returned by every run, whatever happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub run_id: RunId,
    pub input: String,
    /// Index of the last iteration started (0 if cancelled before the first).
    pub iterations: u32,
    pub decision: Option<AgentDecision>,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub usage: TokenUsage,
    pub timestamp: Timestamp,
}

impl AgentResult {
    pub fn is_decided(&self) -> bool {
        self.status == RunStatus::Decided
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(RunStatus::MaxIterations).unwrap(),
            serde_json::json!("max_iterations")
        );
        assert_eq!(RunStatus::MaxIterations.to_string(), "max_iterations");
    }

    #[test]
    fn undecided_result_serializes_null_decision() {
        let result = AgentResult {
            run_id: RunId::new(),
            input: "Jane Doe, Acme".to_string(),
            iterations: 3,
            decision: None,
            status: RunStatus::MaxIterations,
            error: None,
            usage: TokenUsage::default(),
            timestamp: Timestamp::now(),
        };
        let value = serde_json::to_value(&result).unwrap();

        assert!(value["decision"].is_null());
        assert_eq!(value["iterations"], 3);
        assert!(value.get("error").is_none());
        assert!(!result.is_decided());
    }
}
