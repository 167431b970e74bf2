//! Provider endpoint configuration, resolved from the environment.

use std::env;

#[derive(Debug, Clone)]
pub struct ProviderEndpoint {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub openai: ProviderEndpoint,
    pub anthropic: ProviderEndpoint,
}

impl ProviderConfig {
    /// Reads endpoint settings from the environment, with the public API
    /// hosts as defaults. Missing API keys resolve to empty strings so
    /// that offline paths (workflow validation, tests) work without
    /// credentials; the provider rejects the request otherwise.
    pub fn from_env() -> Self {
        Self {
            openai: ProviderEndpoint {
                base_url: env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com".to_string()),
                api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            },
            anthropic: ProviderEndpoint {
                base_url: env::var("ANTHROPIC_BASE_URL")
                    .unwrap_or_else(|_| "https://api.anthropic.com".to_string()),
                api_key: env::var("ANTHROPIC_API_KEY")
                    .or_else(|_| env::var("ANTHROPIC_AUTH_TOKEN"))
                    .unwrap_or_default(),
            },
        }
    }
}
