//! Conversation loop — one logical turn of "complete, execute requested
//! tools, feed results back" repeated until the model stops asking.
//!
//! Each round appends exactly two messages when tools were requested: the
//! adapter's assistant message and a single user message collecting every
//! tool result of that round, in request order. The loop exits when an
//! assistant message carries no tool-use blocks. Rounds are bounded: a
//! model that never stops requesting tools hits the round cap and the
//! turn fails with a dedicated error instead of spinning forever.

use crate::adapters::ProviderAdapter;
use crate::error::EngineError;
use crate::models::{Message, MessageRole, Thread, ToolUse};
use crate::tools::{ToolExecutor, ToolRegistry};

pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 25;

pub struct ConversationLoop<'a> {
    adapter: &'a dyn ProviderAdapter,
    registry: &'a ToolRegistry,
    executor: &'a ToolExecutor,
    max_tool_rounds: usize,
}

impl<'a> ConversationLoop<'a> {
    pub fn new(
        adapter: &'a dyn ProviderAdapter,
        registry: &'a ToolRegistry,
        executor: &'a ToolExecutor,
    ) -> Self {
        Self {
            adapter,
            registry,
            executor,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_max_tool_rounds(mut self, max_tool_rounds: usize) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    /// Drives the thread to the next tool-free assistant message. The
    /// thread state is dumped to the workspace after every provider round.
    pub async fn generate_response(&self, thread: &mut Thread) -> Result<(), EngineError> {
        let mut rounds = 0usize;
        loop {
            let message = self.adapter.complete(thread, self.registry).await?;
            thread.append(message);
            thread.dump_safe().await;

            let calls: Vec<ToolUse> = thread
                .last_message_tool_uses()
                .into_iter()
                .cloned()
                .collect();
            if calls.is_empty() {
                return Ok(());
            }

            rounds += 1;
            if rounds > self.max_tool_rounds {
                return Err(EngineError::ToolLoopExceeded(self.max_tool_rounds));
            }

            // An unregistered tool name is misconfiguration, not a
            // recoverable tool failure; checked before any side effect runs.
            for call in &calls {
                if !self.registry.contains(&call.name) {
                    return Err(EngineError::UnknownTool(call.name.clone()));
                }
            }

            let mut results = Vec::with_capacity(calls.len());
            for call in &calls {
                results.push(self.executor.execute(thread.workspace_path(), call).await);
            }
            thread.append(Message::new(MessageRole::User, results));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentBlock;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Adapter stub that plays back a fixed list of assistant messages.
    #[derive(Debug)]
    struct ScriptedAdapter {
        replies: Mutex<Vec<Message>>,
        calls: AtomicUsize,
    }

    impl ScriptedAdapter {
        fn new(replies: Vec<Message>) -> Self {
            Self {
                replies: Mutex::new(replies),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ProviderAdapter for ScriptedAdapter {
        fn model(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _thread: &Thread,
            _tools: &ToolRegistry,
        ) -> Result<Message, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                Ok(Message::assistant_text("out of script"))
            } else {
                Ok(replies.remove(0))
            }
        }
    }

    fn tool_round(name: &str, input: serde_json::Value) -> Message {
        Message::new(
            MessageRole::Assistant,
            vec![ContentBlock::tool_use("call", name, input)],
        )
    }

    #[tokio::test]
    async fn stops_after_first_tool_free_reply() {
        let dir = tempfile::tempdir().unwrap();
        let replies = vec![
            tool_round("list_files", json!({ "ignore_patterns": [] })),
            tool_round("list_files", json!({ "ignore_patterns": [] })),
            tool_round("list_files", json!({ "ignore_patterns": [] })),
            Message::assistant_text("all done"),
        ];
        let adapter = ScriptedAdapter::new(replies);
        let registry = ToolRegistry::standard();
        let executor = ToolExecutor::new();
        let mut thread = Thread::new(dir.path());

        ConversationLoop::new(&adapter, &registry, &executor)
            .generate_response(&mut thread)
            .await
            .unwrap();

        // N tool rounds plus the final text reply
        assert_eq!(adapter.call_count(), 4);
        assert_eq!(thread.last_message_text(), Some("all done"));
        assert!(thread.last_message_tool_uses().is_empty());
        // 4 assistant messages interleaved with 3 result messages
        assert_eq!(thread.len(), 7);
    }

    #[tokio::test]
    async fn one_failing_call_does_not_abort_its_siblings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("present.txt"), "hello").unwrap();

        let replies = vec![
            Message::new(
                MessageRole::Assistant,
                vec![
                    ContentBlock::tool_use("call_a", "read_file", json!({ "file_path": "absent.txt" })),
                    ContentBlock::tool_use("call_b", "list_files", json!({ "ignore_patterns": [] })),
                ],
            ),
            Message::assistant_text("recovered"),
        ];
        let adapter = ScriptedAdapter::new(replies);
        let registry = ToolRegistry::standard();
        let executor = ToolExecutor::new();
        let mut thread = Thread::new(dir.path());

        ConversationLoop::new(&adapter, &registry, &executor)
            .generate_response(&mut thread)
            .await
            .unwrap();

        // assistant, combined results, final assistant
        assert_eq!(thread.len(), 3);
        let results_message = &thread.messages()[1];
        assert_eq!(results_message.role, MessageRole::User);
        let results: Vec<_> = results_message.tool_results().collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "call_a");
        assert!(results[0].error);
        assert_eq!(results[1].id, "call_b");
        assert!(!results[1].error);
        assert!(results[1].output.contains("present.txt"));
        assert_eq!(thread.last_message_text(), Some("recovered"));
    }

    #[tokio::test]
    async fn endless_tool_requests_hit_the_round_cap() {
        let dir = tempfile::tempdir().unwrap();
        let replies = (0..10)
            .map(|_| tool_round("list_files", json!({ "ignore_patterns": [] })))
            .collect();
        let adapter = ScriptedAdapter::new(replies);
        let registry = ToolRegistry::standard();
        let executor = ToolExecutor::new();
        let mut thread = Thread::new(dir.path());

        let err = ConversationLoop::new(&adapter, &registry, &executor)
            .with_max_tool_rounds(3)
            .generate_response(&mut thread)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::ToolLoopExceeded(3)));
        assert_eq!(adapter.call_count(), 4);
    }

    #[tokio::test]
    async fn unknown_tool_name_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let replies = vec![tool_round("rm_rf", json!({}))];
        let adapter = ScriptedAdapter::new(replies);
        let registry = ToolRegistry::standard();
        let executor = ToolExecutor::new();
        let mut thread = Thread::new(dir.path());

        let err = ConversationLoop::new(&adapter, &registry, &executor)
            .generate_response(&mut thread)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::UnknownTool(name) if name == "rm_rf"));
    }

    #[tokio::test]
    async fn dump_reflects_the_latest_round() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = ScriptedAdapter::new(vec![Message::assistant_text("only reply")]);
        let registry = ToolRegistry::standard();
        let executor = ToolExecutor::new();
        let mut thread = Thread::new(dir.path());
        thread.append_text_message("hello");

        ConversationLoop::new(&adapter, &registry, &executor)
            .generate_response(&mut thread)
            .await
            .unwrap();

        let raw =
            std::fs::read_to_string(dir.path().join(crate::models::THREAD_DUMP_FILE)).unwrap();
        let dump: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(dump["messages"].as_array().unwrap().len(), 2);
    }
}
