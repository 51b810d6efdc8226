//! LLM: provider adapter for code generation.
//!
//! DESIGN
//! ======
//! The `LlmClient` enum dispatches to `OpenAI` or Anthropic based on
//! `LLM_PROVIDER`. Exactly one provider serves a process; there is no
//! fallback between them. Everything above this module talks to the
//! `LlmGenerate` trait only.

pub mod anthropic;
pub mod config;
pub mod openai;
pub mod prompt;
pub mod types;

use config::{LlmConfig, LlmProviderKind};
pub use types::{CallContext, LlmError, LlmGenerate};

// =============================================================================
// CLIENT DISPATCH
// =============================================================================

/// Concrete LLM client that dispatches to either `OpenAI` or Anthropic.
///
/// Configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: LlmProvider,
}

enum LlmProvider {
    OpenAi(openai::OpenAiClient),
    Anthropic(anthropic::AnthropicClient),
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank or the HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = match config.provider {
            LlmProviderKind::OpenAi => LlmProvider::OpenAi(openai::OpenAiClient::new(
                config.api_key,
                &config.model,
                &config.base_url,
                config.timeouts,
            )?),
            LlmProviderKind::Anthropic => LlmProvider::Anthropic(anthropic::AnthropicClient::new(
                config.api_key,
                &config.model,
                &config.base_url,
                config.timeouts,
            )?),
        };
        Ok(Self { inner })
    }

    #[must_use]
    pub fn provider(&self) -> LlmProviderKind {
        match &self.inner {
            LlmProvider::OpenAi(_) => LlmProviderKind::OpenAi,
            LlmProvider::Anthropic(_) => LlmProviderKind::Anthropic,
        }
    }
}

#[async_trait::async_trait]
impl LlmGenerate for LlmClient {
    async fn generate_code(&self, prompt: &str, ctx: &CallContext) -> Result<String, LlmError> {
        match &self.inner {
            LlmProvider::OpenAi(c) => c.generate_code(prompt, ctx).await,
            LlmProvider::Anthropic(c) => c.generate_code(prompt, ctx).await,
        }
    }

    fn model(&self) -> &str {
        match &self.inner {
            LlmProvider::OpenAi(c) => c.model(),
            LlmProvider::Anthropic(c) => c.model(),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
