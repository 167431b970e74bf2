//! ChatDev Core — transport-agnostic domain logic for scripted multi-role
//! AI workflows.
//!
//! A workflow stages a role-play between model-backed personas (CEO,
//! Programmer, Tester, ...) that collaborate on a shared workspace. The
//! crate provides:
//!
//! - the conversation entity model (`models`): content blocks, messages,
//!   threads bound to a workspace directory
//! - provider adapters (`adapters`): one wire-protocol translation per
//!   LLM provider, resolved from the model identifier
//! - the tool layer (`tools`): the fixed capability catalogue the model
//!   may invoke (file I/O, container exec, HTTP) and its executor
//! - the conversation loop (`conversation`): completion + tool execution
//!   rounds until the model stops requesting tools
//! - the workflow layer (`workflow`): declarative workflow definitions
//!   and the turn-taking state machine that drives them
//!
//! It has no CLI or server dependency; `chatdev-cli` provides the binary.

pub mod adapters;
pub mod config;
pub mod conversation;
pub mod error;
pub mod models;
pub mod tools;
pub mod workflow;

// Convenience re-exports
pub use error::EngineError;
pub use models::{ContentBlock, Message, MessageRole, Thread, Tool, ToolResult, ToolUse};
