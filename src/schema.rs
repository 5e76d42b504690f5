use jsonschema::validator_for;
use serde_json::{json, Value};

use crate::config::Limits;

pub const TOOL_ROMANIZE: &str = "romanize";
pub const TOOL_ROMANIZE_BATCH: &str = "romanize_batch";
pub const TOOL_DETECT_SCRIPT: &str = "detect_script";

/// Language-code pattern shared by the schemas and the validation layer.
pub const LANGUAGE_CODE_PATTERN: &str = "^[a-z]{3}$";

#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    #[error("Schema compile error: {0}")]
    SchemaCompile(String),
    #[error("Instance validation failed")]
    ValidationFailed,
}

/// Validate a JSON instance against a JSON Schema (draft 2020-12).
pub fn validate_json(schema: &Value, instance: &Value) -> Result<(), SchemaValidationError> {
    let validator = validator_for(schema).map_err(|e| SchemaValidationError::SchemaCompile(e.to_string()))?;

    if validator.is_valid(instance) {
        Ok(())
    } else {
        Err(SchemaValidationError::ValidationFailed)
    }
}

/// Input schema for one tool, reflecting the limits in force.
pub fn tool_input_schema(name: &str, limits: &Limits) -> Option<Value> {
    let schema = match name {
        TOOL_ROMANIZE => json!({
            "type": "object",
            "required": ["text"],
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Text in any script to convert to the Latin alphabet",
                    "minLength": 1,
                    "maxLength": limits.max_text_length
                },
                "languageCode": {
                    "type": "string",
                    "description": "Optional ISO 639-3 language hint (e.g. 'rus', 'ara', 'hin')",
                    "pattern": LANGUAGE_CODE_PATTERN
                },
                "outputMode": {
                    "type": "string",
                    "description": "'plain' for a string, 'annotated' for per-span engine output",
                    "enum": ["plain", "annotated"],
                    "default": "plain"
                }
            }
        }),
        TOOL_ROMANIZE_BATCH => json!({
            "type": "object",
            "required": ["texts"],
            "properties": {
                "texts": {
                    "type": "array",
                    "description": "Texts to romanize, processed in order",
                    "maxItems": limits.max_batch_size,
                    "items": {
                        "type": "string",
                        "maxLength": limits.max_batch_item_length
                    }
                },
                "languageCode": {
                    "type": "string",
                    "description": "Optional ISO 639-3 language hint applied to every item",
                    "pattern": LANGUAGE_CODE_PATTERN
                }
            }
        }),
        TOOL_DETECT_SCRIPT => json!({
            "type": "object",
            "required": ["text"],
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Text whose writing systems should be identified",
                    "maxLength": limits.max_detect_length
                },
                "detailed": {
                    "type": "boolean",
                    "description": "Include a per-character breakdown of the first 100 characters",
                    "default": false
                }
            }
        }),
        _ => return None,
    };
    Some(schema)
}

/// `tools/list` payload.
pub fn tool_catalog(limits: &Limits) -> Value {
    let tool = |name: &str, description: &str| {
        json!({
            "name": name,
            "description": description,
            "inputSchema": tool_input_schema(name, limits)
        })
    };

    json!({
        "tools": [
            tool(TOOL_ROMANIZE, "Convert text in any script to the Latin alphabet"),
            tool(TOOL_ROMANIZE_BATCH, "Romanize several texts at once; failures are reported per item"),
            tool(TOOL_DETECT_SCRIPT, "Identify the writing systems used in a text"),
        ]
    })
}
