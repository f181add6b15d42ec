//! The structured answer a run is trying to produce.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::domain::foundation::{Confidence, ValidationError};

/// Where a parcel should be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Home,
    Office,
    Both,
    Courier,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Recommendation::Home => "HOME",
            Recommendation::Office => "OFFICE",
            Recommendation::Both => "BOTH",
            Recommendation::Courier => "COURIER",
        };
        write!(f, "{}", s)
    }
}

/// A candidate address with its own supporting evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInfo {
    pub address: String,
    pub confidence: Confidence,
    pub reasoning: String,
}

/// Final answer submitted through the decision tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDecision {
    pub recommendation: Recommendation,
    pub confidence: Confidence,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_address: Option<AddressInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_address: Option<AddressInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Vec<String>>,
}

impl AgentDecision {
    /// Builds a decision from raw tool input.
    pub fn from_tool_input(input: &Map<String, Value>) -> Result<Self, ValidationError> {
        let decision: AgentDecision = serde_json::from_value(Value::Object(input.clone()))
            .map_err(|e| ValidationError::invalid_format("decision", e.to_string()))?;
        decision.validate()?;
        Ok(decision)
    }

    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.reasoning.trim().is_empty() {
            return Err(ValidationError::empty_field("reasoning"));
        }
        for (field, info) in [
            ("home_address", &self.home_address),
            ("office_address", &self.office_address),
        ] {
            if let Some(info) = info {
                if info.address.trim().is_empty() {
                    return Err(ValidationError::empty_field(format!("{}.address", field)));
                }
            }
        }
        Ok(())
    }
}
