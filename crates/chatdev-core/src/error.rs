//! Core error type for the ChatDev engine.
//!
//! `EngineError` covers the fatal conditions: misconfiguration (model or
//! tool resolution), protocol breakdowns between orchestrator and model,
//! and transport failures. Per-tool execution failures are deliberately
//! not represented here — they are folded back into the thread as
//! error-flagged tool results so the model can self-correct (see
//! `tools::executor::ToolError`).

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Could not resolve a provider for model '{0}'")]
    UnresolvableModel(String),

    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Provider request failed: {0}")]
    Provider(String),

    #[error("Protocol failure: {0}")]
    Protocol(String),

    #[error("Tool loop exceeded {0} rounds without a final reply")]
    ToolLoopExceeded(usize),

    #[error("Workflow '{0}' already ended")]
    WorkflowEnded(String),

    #[error("Phase '{0}' already ended")]
    PhaseEnded(String),

    #[error("Invalid workflow definition: {0}")]
    Definition(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
