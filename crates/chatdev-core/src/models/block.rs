//! Content blocks — the atomic units of message content.
//!
//! A block is either free text, a tool invocation requested by the model,
//! or the result of one such invocation fed back by the environment.
//! `ContentBlock` is a closed sum type; every serialization boundary
//! matches on it exhaustively, so a new block kind is a compile-time
//! checked addition.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool invocation requested by the model.
///
/// `id` is the provider-assigned call identifier; the matching
/// [`ToolResult`] carries the same id back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUse {
    pub id: String,
    pub name: String,
    pub input: Value,
}

/// The outcome of one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub id: String,
    pub output: String,
    pub error: bool,
}

/// One atomic unit of message content. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    ToolUse(ToolUse),
    ToolResult(ToolResult),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self::ToolUse(ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        })
    }

    pub fn tool_result(id: impl Into<String>, output: impl Into<String>) -> Self {
        Self::ToolResult(ToolResult {
            id: id.into(),
            output: output.into(),
            error: false,
        })
    }

    pub fn tool_failure(id: impl Into<String>, output: impl Into<String>) -> Self {
        Self::ToolResult(ToolResult {
            id: id.into(),
            output: output.into(),
            error: true,
        })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_tool_use(&self) -> Option<&ToolUse> {
        match self {
            Self::ToolUse(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_tool_result(&self) -> Option<&ToolResult> {
        match self {
            Self::ToolResult(result) => Some(result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blocks_serialize_with_type_tag() {
        let text = serde_json::to_value(ContentBlock::text("hi")).unwrap();
        assert_eq!(text, json!({ "type": "text", "text": "hi" }));

        let call = serde_json::to_value(ContentBlock::tool_use(
            "call_1",
            "read_file",
            json!({ "file_path": "a.txt" }),
        ))
        .unwrap();
        assert_eq!(
            call,
            json!({
                "type": "tool_use",
                "id": "call_1",
                "name": "read_file",
                "input": { "file_path": "a.txt" }
            })
        );

        let result = serde_json::to_value(ContentBlock::tool_failure("call_1", "boom")).unwrap();
        assert_eq!(
            result,
            json!({ "type": "tool_result", "id": "call_1", "output": "boom", "error": true })
        );
    }

    #[test]
    fn accessors_match_variant() {
        let block = ContentBlock::tool_result("id", "ok");
        assert!(block.as_text().is_none());
        assert!(block.as_tool_use().is_none());
        let result = block.as_tool_result().unwrap();
        assert_eq!(result.id, "id");
        assert!(!result.error);
    }
}
