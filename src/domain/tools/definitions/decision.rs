//! The decision tool. Its input is an `AgentDecision`.

use crate::domain::tools::ToolDefinition;

pub const SUBMIT_DECISION: &str = "submit_decision";

pub fn submit_decision_tool() -> ToolDefinition {
    let address_info = serde_json::json!({
        "type": "object",
        "required": ["address", "confidence", "reasoning"],
        "properties": {
            "address": { "type": "string" },
            "confidence": { "type": "integer", "minimum": 0, "maximum": 100 },
            "reasoning": { "type": "string" }
        }
    });

    ToolDefinition::new(
        SUBMIT_DECISION,
        "Submit your final delivery recommendation. Decisions whose confidence is below the \
         run's threshold are rejected and you must keep researching.",
        serde_json::json!({
            "type": "object",
            "required": ["recommendation", "confidence", "reasoning"],
            "properties": {
                "recommendation": {
                    "type": "string",
                    "enum": ["HOME", "OFFICE", "BOTH", "COURIER"]
                },
                "confidence": { "type": "integer", "minimum": 0, "maximum": 100 },
                "reasoning": { "type": "string" },
                "home_address": address_info.clone(),
                "office_address": address_info,
                "flags": { "type": "array", "items": { "type": "string" } }
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tools::validate_input;
    use serde_json::json;

    #[test]
    fn schema_rejects_confidence_above_100() {
        let tool = submit_decision_tool();
        let input = json!({"recommendation": "HOME", "confidence": 140, "reasoning": "x"});
        assert!(validate_input(tool.input_schema(), input.as_object().unwrap()).is_err());
    }

    #[test]
    fn schema_checks_nested_address() {
        let tool = submit_decision_tool();
        let input = json!({
            "recommendation": "HOME",
            "confidence": 80,
            "reasoning": "x",
            "home_address": { "address": "1 Elm St" }
        });
        let err = validate_input(tool.input_schema(), input.as_object().unwrap()).unwrap_err();
        assert!(err.to_string().contains("home_address.confidence"));
    }
}
