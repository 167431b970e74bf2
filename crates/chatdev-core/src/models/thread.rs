//! Threads — the ordered message log of one workflow run, bound to a
//! workspace directory.
//!
//! A thread is append-only: messages are never edited or removed once
//! appended. After every provider round the full thread state is dumped
//! as JSON into the workspace for inspection and recovery; the dump is
//! never read back in automatically.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::block::ToolUse;
use super::message::Message;

/// File name of the per-workspace thread dump.
pub const THREAD_DUMP_FILE: &str = ".chatdev-thread.json";

#[derive(Debug, Clone, Serialize)]
pub struct Thread {
    workspace_path: PathBuf,
    messages: Vec<Message>,
}

impl Thread {
    pub fn new(workspace_path: impl Into<PathBuf>) -> Self {
        Self {
            workspace_path: workspace_path.into(),
            messages: Vec::new(),
        }
    }

    pub fn workspace_path(&self) -> &Path {
        &self.workspace_path
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Appends a user message holding a single text block.
    pub fn append_text_message(&mut self, text: impl Into<String>) {
        self.append(Message::user_text(text));
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The tool invocations of the last message; empty when the thread is
    /// empty or the last message carries none.
    pub fn last_message_tool_uses(&self) -> Vec<&ToolUse> {
        self.last_message()
            .map(|message| message.tool_uses().collect())
            .unwrap_or_default()
    }

    /// The text of the first text block of the last message.
    pub fn last_message_text(&self) -> Option<&str> {
        self.last_message().and_then(Message::first_text)
    }

    /// Writes the full thread state to `.chatdev-thread.json` in the
    /// workspace, replacing any previous dump.
    pub async fn dump(&self) -> Result<(), std::io::Error> {
        tokio::fs::create_dir_all(&self.workspace_path).await?;
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(self.workspace_path.join(THREAD_DUMP_FILE), json).await
    }

    /// Like [`Thread::dump`], but a failed dump only logs a warning. The
    /// dump is a debug artifact; it must not take the run down with it.
    pub async fn dump_safe(&self) {
        if let Err(e) = self.dump().await {
            tracing::warn!("Failed to dump thread state: {}", e);
        }
    }
}
