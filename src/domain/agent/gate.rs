//! Confidence gate deciding whether a submitted decision ends the run.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::AgentDecision;
use crate::domain::foundation::Confidence;

/// Outcome of putting a decision through the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateVerdict {
    Accepted,
    Rejected { confidence: Confidence, threshold: Confidence },
}

impl GateVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, GateVerdict::Accepted)
    }
}

/// Minimum self-reported confidence a decision needs to be terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceGate {
    threshold: Confidence,
}

impl ConfidenceGate {
    pub fn new(threshold: Confidence) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> Confidence {
        self.threshold
    }

    /// `confidence >= threshold`.
    pub fn accept(&self, decision: &AgentDecision) -> bool {
        decision.confidence >= self.threshold
    }

    pub fn evaluate(&self, decision: &AgentDecision) -> GateVerdict {
        if self.accept(decision) {
            GateVerdict::Accepted
        } else {
            GateVerdict::Rejected {
                confidence: decision.confidence,
                threshold: self.threshold,
            }
        }
    }

    /// Tool output the model sees after a rejected submission.
    pub fn rejection_feedback(&self, decision: &AgentDecision) -> serde_json::Value {
        json!({
            "rejected": true,
            "reason": format!(
                "Confidence {} is below the required threshold of {}. Keep investigating: \
                 verify the address with additional sources before submitting again.",
                decision.confidence, self.threshold
            ),
            "confidence": decision.confidence.value(),
            "threshold": self.threshold.value(),
        })
    }
}
