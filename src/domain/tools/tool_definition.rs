//! Tool definition - name, description and input schema.

use serde::{Deserialize, Serialize};

/// A tool the model may call.
///
/// The same definition is rendered into each vendor's native tool format by
/// [`to_openai_format`](Self::to_openai_format) and
/// [`to_anthropic_format`](Self::to_anthropic_format).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name the model calls the tool by (e.g., "web_search")
    name: String,

    /// What the tool does and when to use it
    description: String,

    /// JSON Schema for the tool input object
    input_schema: serde_json::Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_schema(&self) -> &serde_json::Value {
        &self.input_schema
    }

    /// OpenAI function-calling shape.
    pub fn to_openai_format(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.input_schema
            }
        })
    }

    /// Anthropic tool shape.
    pub fn to_anthropic_format(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "input_schema": self.input_schema
        })
    }
}
