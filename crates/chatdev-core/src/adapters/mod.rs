//! Provider adapters — translate between the thread entity model and one
//! LLM provider's wire protocol.
//!
//! Each adapter owns exactly two concerns: outbound normalization (thread
//! messages and tool declarations into the provider's request shape) and
//! inbound normalization (the provider's single-choice response into one
//! assistant message). Tool execution is composed on top by
//! `conversation::ConversationLoop`; it depends on an adapter, never the
//! other way around.

pub mod anthropic;
pub mod factory;
pub mod openai;

pub use anthropic::AnthropicAdapter;
pub use factory::{AdapterResolver, ProviderFactory};
pub use openai::OpenAiAdapter;

use crate::error::EngineError;
use crate::models::{Message, Thread};
use crate::tools::ToolRegistry;

#[async_trait::async_trait]
pub trait ProviderAdapter: Send + Sync + std::fmt::Debug {
    /// Model identifier this adapter was resolved for.
    fn model(&self) -> &str;

    /// Requests a single completion for the thread, with the registry's
    /// tools declared, and returns the resulting assistant message.
    async fn complete(
        &self,
        thread: &Thread,
        tools: &ToolRegistry,
    ) -> Result<Message, EngineError>;
}
