//! Adapter resolution — maps a model identifier onto a provider adapter.
//!
//! Resolution is by prefix convention: `gpt-*` models go to the OpenAI
//! adapter, `claude-*` models to the Anthropic adapter. Anything else is
//! a fatal misconfiguration. Because every role may name a different
//! model, the workflow manager resolves afresh on every turn.

use std::time::Duration;

use crate::adapters::{AnthropicAdapter, OpenAiAdapter, ProviderAdapter};
use crate::config::ProviderConfig;
use crate::error::EngineError;

pub const OPENAI_MODEL_PREFIX: &str = "gpt-";
pub const ANTHROPIC_MODEL_PREFIX: &str = "claude-";

/// Resolves model identifiers to adapters. A trait so that tests and
/// alternative deployments can script the resolution.
pub trait AdapterResolver: Send + Sync {
    fn adapter(&self, model: &str) -> Result<Box<dyn ProviderAdapter>, EngineError>;
}

pub struct ProviderFactory {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl ProviderFactory {
    pub fn new(config: ProviderConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, config }
    }
}

impl AdapterResolver for ProviderFactory {
    fn adapter(&self, model: &str) -> Result<Box<dyn ProviderAdapter>, EngineError> {
        if model.starts_with(OPENAI_MODEL_PREFIX) {
            return Ok(Box::new(OpenAiAdapter::new(
                self.client.clone(),
                self.config.openai.base_url.clone(),
                self.config.openai.api_key.clone(),
                model,
            )));
        }

        if model.starts_with(ANTHROPIC_MODEL_PREFIX) {
            return Ok(Box::new(AnthropicAdapter::new(
                self.client.clone(),
                self.config.anthropic.base_url.clone(),
                self.config.anthropic.api_key.clone(),
                model,
            )));
        }

        Err(EngineError::UnresolvableModel(model.to_string()))
    }
}
