//! OpenAI chat-completions adapter.
//!
//! The chat-completions protocol has no uniform content list: one logical
//! message fans out into 1..N wire entries. Assistant text and tool calls
//! combine into a single entry (empty fields omitted), while every tool
//! result becomes its own `role: "tool"` entry tagged with the
//! originating call id. Inbound, a single choice folds back into one
//! assistant message of text and tool-use blocks.

use serde_json::{json, Map, Value};

use crate::adapters::ProviderAdapter;
use crate::error::EngineError;
use crate::models::{ContentBlock, Message, MessageRole, Thread};
use crate::tools::ToolRegistry;

#[derive(Debug)]
pub struct OpenAiAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAdapter {
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
impl ProviderAdapter for OpenAiAdapter {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        thread: &Thread,
        tools: &ToolRegistry,
    ) -> Result<Message, EngineError> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "messages": thread_to_wire(thread.messages()),
            "tools": tool_declarations(tools),
        });

        tracing::debug!(model = %self.model, "Calling OpenAI chat completions");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(EngineError::Provider(format!(
                "OpenAI API returned {status}: {text}"
            )));
        }

        let body: Value = serde_json::from_str(&text)?;
        parse_response(&body)
    }
}

/// Serializes the whole thread into chat-completions entries.
pub fn thread_to_wire(messages: &[Message]) -> Vec<Value> {
    messages.iter().flat_map(split_message).collect()
}

/// Fans one logical message out into its wire entries.
///
/// - user text → one `role: "user"` entry with a content-part list
/// - assistant text + tool calls → one `role: "assistant"` entry,
///   omitting `content`/`tool_calls` when empty
/// - each tool result → its own `role: "tool"` entry
pub fn split_message(message: &Message) -> Vec<Value> {
    let text_parts: Vec<Value> = message
        .texts()
        .map(|text| json!({ "type": "text", "text": text }))
        .collect();

    let tool_calls: Vec<Value> = message
        .tool_uses()
        .map(|call| {
            json!({
                "id": call.id,
                "type": "function",
                "function": {
                    "name": call.name,
                    "arguments": call.input.to_string(),
                }
            })
        })
        .collect();

    let tool_entries: Vec<Value> = message
        .tool_results()
        .map(|result| {
            let kind = if result.error { "error" } else { "success" };
            json!({
                "role": "tool",
                "tool_call_id": result.id,
                "content": json!({ "type": kind, "content": result.output }).to_string(),
            })
        })
        .collect();

    if text_parts.is_empty() && tool_calls.is_empty() {
        return tool_entries;
    }

    let head = match message.role {
        MessageRole::User => json!({ "role": "user", "content": text_parts }),
        MessageRole::Assistant => {
            let mut entry = Map::new();
            entry.insert("role".to_string(), json!("assistant"));
            let joined = message.texts().collect::<Vec<_>>().join("\n");
            if !joined.is_empty() {
                entry.insert("content".to_string(), json!(joined));
            }
            if !tool_calls.is_empty() {
                entry.insert("tool_calls".to_string(), json!(tool_calls));
            }
            Value::Object(entry)
        }
    };

    let mut entries = vec![head];
    entries.extend(tool_entries);
    entries
}

/// Parses the first choice of a chat-completions response into one
/// assistant message. Tool-call arguments arrive as provider-native JSON
/// strings and are parsed into structured input.
pub fn parse_response(body: &Value) -> Result<Message, EngineError> {
    let wire = body
        .pointer("/choices/0/message")
        .ok_or_else(|| EngineError::Provider("response carried no choices".to_string()))?;

    let mut content = Vec::new();
    if let Some(text) = wire.get("content").and_then(Value::as_str) {
        content.push(ContentBlock::text(text));
    }
    if let Some(calls) = wire.get("tool_calls").and_then(Value::as_array) {
        for call in calls {
            let id = call
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| EngineError::Provider("tool call without id".to_string()))?;
            let name = call
                .pointer("/function/name")
                .and_then(Value::as_str)
                .ok_or_else(|| EngineError::Provider("tool call without name".to_string()))?;
            let arguments = call
                .pointer("/function/arguments")
                .and_then(Value::as_str)
                .ok_or_else(|| EngineError::Provider("tool call without arguments".to_string()))?;
            content.push(ContentBlock::tool_use(
                id,
                name,
                serde_json::from_str(arguments)?,
            ));
        }
    }

    Ok(Message::new(MessageRole::Assistant, content))
}

/// Declares the registry in the nested `{type: "function", ...}` shape.
pub fn tool_declarations(tools: &ToolRegistry) -> Vec<Value> {
    tools
        .tools()
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.input_schema,
                }
            })
        })
        .collect()
}
