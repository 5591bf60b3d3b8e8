use serde::{Deserialize, Serialize};

/// Structured-output contract attached to a request
///
/// Only strict JSON-schema mode is supported; the schema itself travels as
/// a raw JSON value and is checked for strict compatibility before the
/// request leaves the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Closed-world JSON schema the model output must conform to
    JsonSchema {
        /// Schema specification
        json_schema: JsonSchemaSpec,
    },
}

impl ResponseFormat {
    /// Wrap a schema spec in strict JSON-schema mode
    pub const fn json_schema(spec: JsonSchemaSpec) -> Self {
        Self::JsonSchema { json_schema: spec }
    }

    /// The schema spec carried by this format
    pub const fn spec(&self) -> &JsonSchemaSpec {
        match self {
            Self::JsonSchema { json_schema } => json_schema,
        }
    }
}

/// Named JSON schema in strict mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchemaSpec {
    /// Schema name reported to the model
    pub name: String,
    /// Must be true; lenient mode is not supported
    pub strict: bool,
    /// The JSON Schema object (`type: object`, explicit `required`,
    /// `additionalProperties: false`)
    pub schema: serde_json::Value,
}

impl JsonSchemaSpec {
    /// Create a strict schema spec
    pub fn strict(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            strict: true,
            schema,
        }
    }
}
