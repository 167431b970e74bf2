//! Tool declarations — a named capability with a JSON-Schema input shape.
//!
//! Tools are declared once in the registry (see `tools`) and translated
//! into each provider's function-calling format by the adapters.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl Tool {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}
