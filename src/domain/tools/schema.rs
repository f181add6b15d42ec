//! Validation of tool input against the tool's declared JSON Schema.
//!
//! Supports the subset the tool definitions use: `type`, `properties`,
//! `required`, `enum`, `minimum`/`maximum`, `minItems` and `items`.
//! Unknown keywords are ignored.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur during schema validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaValidationError {
    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid type for field {field}: expected {expected}, got {actual}")]
    InvalidType {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid value for field {field}: expected one of {allowed:?}")]
    NotInEnum { field: String, allowed: Vec<String> },

    #[error("Value out of range for field {field}: {value} not in [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("Array too short for field {field}: minimum {min}, got {actual}")]
    ArrayTooShort {
        field: String,
        min: usize,
        actual: usize,
    },

    #[error("{}", join_messages(.0))]
    Multiple(Vec<SchemaValidationError>),
}

fn join_messages(errors: &[SchemaValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validates a tool input object against `schema`.
///
/// Collects every violation instead of stopping at the first, so the model
/// can fix its whole call in one retry.
pub fn validate_input(schema: &Value, input: &Map<String, Value>) -> Result<(), SchemaValidationError> {
    let mut errors = Vec::new();
    validate_object(schema, input, "", &mut errors);

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(SchemaValidationError::Multiple(errors)),
    }
}

fn validate_object(
    schema: &Value,
    object: &Map<String, Value>,
    path: &str,
    errors: &mut Vec<SchemaValidationError>,
) {
    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            match object.get(field) {
                None | Some(Value::Null) => errors.push(SchemaValidationError::MissingRequired {
                    field: join_path(path, field),
                }),
                Some(_) => {}
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return;
    };

    for (name, value) in object {
        // Optional fields sent as null are treated as absent.
        if value.is_null() {
            continue;
        }
        if let Some(prop_schema) = properties.get(name) {
            validate_value(prop_schema, value, &join_path(path, name), errors);
        }
    }
}

fn validate_value(schema: &Value, value: &Value, field: &str, errors: &mut Vec<SchemaValidationError>) {
    if let Some(expected) = schema.get("type").and_then(Value::as_str) {
        if !type_matches(expected, value) {
            errors.push(SchemaValidationError::InvalidType {
                field: field.to_string(),
                expected: expected.to_string(),
                actual: json_type(value).to_string(),
            });
            return;
        }
    }

    if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            errors.push(SchemaValidationError::NotInEnum {
                field: field.to_string(),
                allowed: allowed
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect(),
            });
        }
    }

    if let Some(number) = value.as_f64() {
        let min = schema.get("minimum").and_then(Value::as_f64);
        let max = schema.get("maximum").and_then(Value::as_f64);
        let below = min.is_some_and(|m| number < m);
        let above = max.is_some_and(|m| number > m);
        if below || above {
            errors.push(SchemaValidationError::OutOfRange {
                field: field.to_string(),
                value: value.to_string(),
                min: min.map_or_else(|| "-inf".to_string(), |m| m.to_string()),
                max: max.map_or_else(|| "inf".to_string(), |m| m.to_string()),
            });
        }
    }

    match value {
        Value::Object(object) => validate_object(schema, object, field, errors),
        Value::Array(items) => {
            if let Some(min) = schema.get("minItems").and_then(Value::as_u64) {
                if (items.len() as u64) < min {
                    errors.push(SchemaValidationError::ArrayTooShort {
                        field: field.to_string(),
                        min: min as usize,
                        actual: items.len(),
                    });
                }
            }
            if let Some(item_schema) = schema.get("items") {
                for (idx, item) in items.iter().enumerate() {
                    validate_value(item_schema, item, &format!("{}[{}]", field, idx), errors);
                }
            }
        }
        _ => {}
    }
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64() || value.as_f64().is_some_and(|f| f.fract() == 0.0),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["query", "count"],
            "properties": {
                "query": { "type": "string" },
                "count": { "type": "integer", "minimum": 1, "maximum": 10 },
                "category": { "type": "string", "enum": ["general", "news"] },
                "zips": { "type": "array", "minItems": 1, "items": { "type": "string" } },
                "home": {
                    "type": "object",
                    "required": ["address"],
                    "properties": { "address": { "type": "string" } }
                }
            }
        })
    }

    fn input(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn valid_input_passes() {
        let ok = validate_input(
            &schema(),
            &input(json!({"query": "jane", "count": 3, "category": "news", "zips": ["94110"]})),
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn missing_required_field_is_reported() {
        let err = validate_input(&schema(), &input(json!({"count": 3}))).unwrap_err();
        assert_eq!(
            err,
            SchemaValidationError::MissingRequired {
                field: "query".to_string()
            }
        );
    }

    #[test]
    fn wrong_type_is_reported() {
        let err = validate_input(&schema(), &input(json!({"query": 5, "count": 3}))).unwrap_err();
        assert!(matches!(err, SchemaValidationError::InvalidType { ref expected, .. } if expected == "string"));
    }

    #[test]
    fn enum_and_range_violations_are_collected() {
        let err = validate_input(
            &schema(),
            &input(json!({"query": "x", "count": 50, "category": "sports"})),
        )
        .unwrap_err();

        match err {
            SchemaValidationError::Multiple(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected Multiple, got {:?}", other),
        }
    }

    #[test]
    fn nested_paths_are_dotted() {
        let err = validate_input(
            &schema(),
            &input(json!({"query": "x", "count": 1, "home": {}})),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: home.address");
    }

    #[test]
    fn array_items_are_checked() {
        let err = validate_input(
            &schema(),
            &input(json!({"query": "x", "count": 1, "zips": [94110]})),
        )
        .unwrap_err();
        assert!(err.to_string().contains("zips[0]"));
    }

    #[test]
    fn null_optional_fields_are_ignored() {
        assert!(validate_input(
            &schema(),
            &input(json!({"query": "x", "count": 1, "category": null}))
        )
        .is_ok());
    }

    #[test]
    fn integral_float_counts_as_integer() {
        assert!(validate_input(&schema(), &input(json!({"query": "x", "count": 2.0}))).is_ok());
    }

    proptest! {
        #[test]
        fn count_range_is_enforced(count in -20i64..40) {
            let result = validate_input(&schema(), &input(json!({"query": "x", "count": count})));
            prop_assert_eq!(result.is_ok(), (1..=10).contains(&count));
        }
    }
}
