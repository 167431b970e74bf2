//! Messages — ordered block sequences with an authorship role.

use serde::{Deserialize, Serialize};

use super::block::{ContentBlock, ToolResult, ToolUse};

/// Who authored a message. Tool results always travel in `User` messages
/// (they are environment feedback); tool invocations only ever appear in
/// `Assistant` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn new(role: MessageRole, content: Vec<ContentBlock>) -> Self {
        Self { role, content }
    }

    /// A user message holding a single text block.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, vec![ContentBlock::text(text)])
    }

    /// An assistant message holding a single text block.
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, vec![ContentBlock::text(text)])
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(ContentBlock::as_text)
    }

    pub fn first_text(&self) -> Option<&str> {
        self.texts().next()
    }

    pub fn tool_uses(&self) -> impl Iterator<Item = &ToolUse> {
        self.content.iter().filter_map(ContentBlock::as_tool_use)
    }

    pub fn tool_results(&self) -> impl Iterator<Item = &ToolResult> {
        self.content.iter().filter_map(ContentBlock::as_tool_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filters_blocks_by_kind() {
        let message = Message::new(
            MessageRole::Assistant,
            vec![
                ContentBlock::text("first"),
                ContentBlock::tool_use("c1", "list_files", json!({ "ignore_patterns": [] })),
                ContentBlock::text("second"),
            ],
        );

        assert_eq!(message.texts().collect::<Vec<_>>(), vec!["first", "second"]);
        assert_eq!(message.first_text(), Some("first"));
        assert_eq!(message.tool_uses().count(), 1);
        assert_eq!(message.tool_results().count(), 0);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(MessageRole::Assistant).unwrap(),
            json!("assistant")
        );
        assert_eq!(MessageRole::User.as_str(), "user");
    }
}
