//! Anthropic messages-API adapter.
//!
//! The messages API accepts one heterogeneous content list per message —
//! text, tool-use and tool-result items all travel uniformly tagged — so
//! outbound normalization is a one-to-one mapping. Tool declarations pass
//! `{name, description, input_schema}` through unchanged.

use serde_json::{json, Value};

use crate::adapters::ProviderAdapter;
use crate::error::EngineError;
use crate::models::{ContentBlock, Message, MessageRole, Thread};
use crate::tools::ToolRegistry;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 8192;

#[derive(Debug)]
pub struct AnthropicAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AnthropicAdapter {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        thread: &Thread,
        tools: &ToolRegistry,
    ) -> Result<Message, EngineError> {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": thread_to_wire(thread.messages()),
            "tools": tool_declarations(tools),
        });

        tracing::debug!(model = %self.model, "Calling Anthropic messages API");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(EngineError::Provider(format!(
                "Anthropic API returned {status}: {text}"
            )));
        }

        let body: Value = serde_json::from_str(&text)?;
        parse_response(&body)
    }
}

/// Serializes the whole thread, one wire entry per message.
pub fn thread_to_wire(messages: &[Message]) -> Vec<Value> {
    messages.iter().map(message_to_wire).collect()
}

pub fn message_to_wire(message: &Message) -> Value {
    let content: Vec<Value> = message.content.iter().map(block_to_wire).collect();
    json!({ "role": message.role.as_str(), "content": content })
}

fn block_to_wire(block: &ContentBlock) -> Value {
    match block {
        ContentBlock::Text { text } => json!({ "type": "text", "text": text }),
        ContentBlock::ToolUse(call) => json!({
            "type": "tool_use",
            "id": call.id,
            "name": call.name,
            "input": call.input,
        }),
        ContentBlock::ToolResult(result) => json!({
            "type": "tool_result",
            "tool_use_id": result.id,
            "content": result.output,
            "is_error": result.error,
        }),
    }
}

/// Parses a messages-API response into one assistant message, preserving
/// content order. Unknown content item types are skipped.
pub fn parse_response(body: &Value) -> Result<Message, EngineError> {
    let items = body
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| EngineError::Provider("response carried no content".to_string()))?;

    let mut content = Vec::new();
    for item in items {
        match item.get("type").and_then(Value::as_str) {
            Some("text") => {
                let text = item
                    .get("text")
                    .and_then(Value::as_str)
                    .ok_or_else(|| EngineError::Provider("text item without text".to_string()))?;
                content.push(ContentBlock::text(text));
            }
            Some("tool_use") => {
                let id = item
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| EngineError::Provider("tool_use item without id".to_string()))?;
                let name = item.get("name").and_then(Value::as_str).ok_or_else(|| {
                    EngineError::Provider("tool_use item without name".to_string())
                })?;
                let input = item.get("input").cloned().unwrap_or_else(|| json!({}));
                content.push(ContentBlock::tool_use(id, name, input));
            }
            other => {
                tracing::debug!(kind = ?other, "Skipping unsupported content item");
            }
        }
    }

    Ok(Message::new(MessageRole::Assistant, content))
}

/// Declares the registry in the flat `{name, description, input_schema}` shape.
pub fn tool_declarations(tools: &ToolRegistry) -> Vec<Value> {
    tools
        .tools()
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "description": tool.description,
                "input_schema": tool.input_schema,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_message_maps_to_one_wire_entry() {
        let message = Message::new(
            MessageRole::User,
            vec![
                ContentBlock::text("please"),
                ContentBlock::tool_result("call_1", "done"),
                ContentBlock::tool_failure("call_2", "missing"),
            ],
        );

        let wire = message_to_wire(&message);
        assert_eq!(wire["role"], "user");
        let content = wire["content"].as_array().unwrap();
        assert_eq!(content.len(), 3);
        assert_eq!(content[0], json!({ "type": "text", "text": "please" }));
        assert_eq!(
            content[1],
            json!({ "type": "tool_result", "tool_use_id": "call_1", "content": "done", "is_error": false })
        );
        assert_eq!(content[2]["is_error"], true);
    }

    #[test]
    fn tool_use_blocks_keep_structured_input() {
        let message = Message::new(
            MessageRole::Assistant,
            vec![ContentBlock::tool_use(
                "toolu_1",
                "write_file",
                json!({ "file_path": "a", "content": "b" }),
            )],
        );
        let wire = message_to_wire(&message);
        assert_eq!(
            wire["content"][0],
            json!({
                "type": "tool_use",
                "id": "toolu_1",
                "name": "write_file",
                "input": { "file_path": "a", "content": "b" }
            })
        );
    }

    #[test]
    fn parse_response_keeps_block_order() {
        let body = json!({
            "content": [
                { "type": "text", "text": "let me check" },
                { "type": "tool_use", "id": "toolu_1", "name": "read_file",
                  "input": { "file_path": "x" } },
                { "type": "text", "text": "and also" }
            ]
        });

        let message = parse_response(&body).unwrap();
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.content.len(), 3);
        assert_eq!(message.first_text(), Some("let me check"));
        assert_eq!(message.tool_uses().next().unwrap().name, "read_file");
    }

    #[test]
    fn text_only_round_trip_preserves_role_and_order() {
        let original = Message::assistant_text("SUCCESS");
        let wire = message_to_wire(&original);
        let parsed = parse_response(&json!({ "content": wire["content"] })).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn unknown_content_items_are_skipped() {
        let body = json!({
            "content": [
                { "type": "thinking", "thinking": "hmm" },
                { "type": "text", "text": "answer" }
            ]
        });
        let message = parse_response(&body).unwrap();
        assert_eq!(message.content.len(), 1);
        assert_eq!(message.first_text(), Some("answer"));
    }

    #[test]
    fn declarations_are_flat() {
        let registry = ToolRegistry::standard();
        let declarations = tool_declarations(&registry);
        for declaration in &declarations {
            assert!(declaration["name"].is_string());
            assert!(declaration["input_schema"].is_object());
            assert!(declaration.get("function").is_none());
        }
    }
}
