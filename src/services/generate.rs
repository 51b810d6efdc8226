//! Generate service: prompt → provider call → code extraction.
//!
//! DESIGN
//! ======
//! Validates the prompt before any I/O, calls the configured `LlmGenerate`
//! once under the caller's `CallContext`, then extracts the first fenced
//! block. Either stage failing fails the whole request; there are no retries,
//! defaults, or partial results.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::llm::{CallContext, LlmError, LlmGenerate};
use crate::services::extract::{ExtractError, ExtractedCode, extract_code_block};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("prompt is required")]
    EmptyPrompt,
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("failed to extract code: {0}")]
    Extract(#[from] ExtractError),
}

impl ErrorCode for GenerateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyPrompt => "E_EMPTY_PROMPT",
            Self::Llm(e) => e.error_code(),
            Self::Extract(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Llm(e) if e.retryable())
    }
}

/// Inbound request. A missing or `null` prompt reads as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl GenerationRequest {
    /// The prompt if it has any non-whitespace content.
    #[must_use]
    pub fn validated_prompt(&self) -> Option<&str> {
        self.prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }
}

/// Uniform outbound shape: `code` iff `success`, `error` iff not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ExtractedCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResponse {
    #[must_use]
    pub fn succeeded(code: ExtractedCode) -> Self {
        Self { success: true, code: Some(code), error: None }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, code: None, error: Some(message.into()) }
    }
}

impl From<Result<ExtractedCode, GenerateError>> for GenerationResponse {
    fn from(result: Result<ExtractedCode, GenerateError>) -> Self {
        match result {
            Ok(code) => Self::succeeded(code),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Run one generation request to completion.
///
/// # Errors
///
/// [`GenerateError::EmptyPrompt`] without touching the provider, otherwise
/// the first provider or extraction failure.
pub async fn generate(
    llm: &dyn LlmGenerate,
    request: &GenerationRequest,
    ctx: &CallContext,
) -> Result<ExtractedCode, GenerateError> {
    let result = run(llm, request, ctx).await;
    if let Err(e) = &result {
        warn!(code = e.error_code(), retryable = e.retryable(), error = %e, "generate: request failed");
    }
    result
}

async fn run(
    llm: &dyn LlmGenerate,
    request: &GenerationRequest,
    ctx: &CallContext,
) -> Result<ExtractedCode, GenerateError> {
    let prompt = request
        .validated_prompt()
        .ok_or(GenerateError::EmptyPrompt)?;
    info!(prompt_len = prompt.len(), model = llm.model(), "generate: prompt received");

    let raw = llm.generate_code(prompt, ctx).await?;
    info!(raw_len = raw.len(), "generate: LLM response");

    let block = extract_code_block(&raw)?;
    info!(language = block.language.unwrap_or("-"), html_len = block.body.len(), "generate: code extracted");

    Ok(block.into())
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
