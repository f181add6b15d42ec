//! ToolResult - the only shape a tool call ever returns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a dispatched tool call.
///
/// Failures are data, not errors: the model reads `summary` and `error` and
/// decides what to try next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(summary: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            summary: summary.into(),
            error: None,
        }
    }

    pub fn failure(summary: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            summary: summary.into(),
            error,
        }
    }

    /// A failed result that still carries structured detail for the model.
    pub fn failure_with_data(summary: impl Into<String>, data: Value) -> Self {
        Self {
            success: false,
            data: Some(data),
            summary: summary.into(),
            error: None,
        }
    }

    /// Text placed into the transcript's `tool_result` block.
    pub fn to_content_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.summary.clone())
    }
}
