//! Request body validation.
//!
//! Checks required-field presence and primitive type/format conformance
//! against a resolved schema. Runs before any store mutation so a rejected
//! request leaves no trace.

use crate::domain::FieldError;
use serde_json::Value;

/// Validate `body` against a resolved object schema. An empty result means
/// the body passed.
pub fn validate_body(schema: &Value, body: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let Some(fields) = body.as_object() else {
        errors.push(FieldError::new(
            "body",
            "Request body must be a JSON object",
            "INVALID_BODY",
        ));
        return errors;
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            let missing = fields.get(name).map(Value::is_null).unwrap_or(true);
            if missing {
                errors.push(FieldError::new(
                    name,
                    format!("Missing required field '{name}'"),
                    "MISSING_REQUIRED_FIELD",
                ));
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (name, prop_schema) in properties {
            let Some(value) = fields.get(name) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            if let Some(error) = check_type(name, prop_schema, value) {
                errors.push(error);
                continue;
            }
            if let (Some(format), Some(text)) = (
                prop_schema.get("format").and_then(Value::as_str),
                value.as_str(),
            ) {
                if let Some(error) = check_format(name, format, text) {
                    errors.push(error);
                }
            }
        }
    }

    errors
}

fn check_type(field: &str, schema: &Value, value: &Value) -> Option<FieldError> {
    let declared = schema.get("type").and_then(Value::as_str)?;
    let ok = match declared {
        "string" => value.is_string(),
        "integer" => value.as_i64().is_some() || value.as_u64().is_some(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    };
    if ok {
        None
    } else {
        Some(FieldError::new(
            field,
            format!("Expected {declared}, got {}", type_name(value)),
            "INVALID_TYPE",
        ))
    }
}

fn check_format(field: &str, format: &str, text: &str) -> Option<FieldError> {
    let ok = match format {
        "email" => {
            let at = text.find('@');
            matches!(at, Some(pos) if pos > 0 && text[pos + 1..].contains('.'))
        }
        "uuid" => uuid::Uuid::parse_str(text).is_ok(),
        "date" => chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok(),
        "date-time" => chrono::DateTime::parse_from_rfc3339(text).is_ok(),
        _ => true,
    };
    if ok {
        None
    } else {
        Some(FieldError::new(
            field,
            format!("Invalid {format} format"),
            "INVALID_FORMAT",
        ))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
