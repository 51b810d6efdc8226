//! LLM types: provider-neutral messages, call context, and errors.
//!
//! Shared by the `OpenAI` and Anthropic clients. Wire formats stay private
//! to each client module; everything here is what the rest of the crate sees.

use std::future::Future;

use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client construction and calls.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The API key is absent or blank.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The HTTP request to the LLM provider failed (connect, DNS, body read).
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The request outlived the client timeout or the caller's deadline.
    #[error("API request timed out")]
    Timeout,

    /// The caller cancelled the request before the provider answered.
    #[error("API request cancelled")]
    Cancelled,

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The LLM provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The provider populated its own error object.
    #[error("provider error ({kind}): {message}")]
    Provider { kind: String, message: String },

    /// The provider answered without any choice to read text from.
    #[error("empty response: provider returned no choices")]
    EmptyResponse,
}

impl crate::error::ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::Timeout => "E_TIMEOUT",
            Self::Cancelled => "E_CANCELLED",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::Provider { .. } => "E_PROVIDER",
            Self::EmptyResponse => "E_EMPTY_RESPONSE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::Timeout | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

/// Translate a transport failure, keeping timeouts distinguishable.
pub(crate) fn request_failed(err: &reqwest::Error) -> LlmError {
    if err.is_timeout() { LlmError::Timeout } else { LlmError::ApiRequest(err.to_string()) }
}

// =============================================================================
// MESSAGE TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single message in the conversation sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

// =============================================================================
// CALL CONTEXT
// =============================================================================

/// Cancellation token plus optional deadline accompanying one provider call.
///
/// The client timeout still applies on top of whatever deadline is set here,
/// so a far-off deadline never extends a call past that bound.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_timeout(self, timeout: std::time::Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Drive `fut` to completion unless the token fires or the deadline
    /// passes first. The losing future is dropped, which aborts any
    /// in-flight HTTP request it owns.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Cancelled`] or [`LlmError::Timeout`] when the call
    /// is cut short, otherwise whatever `fut` resolves to.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, LlmError>
    where
        F: Future<Output = Result<T, LlmError>>,
    {
        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(LlmError::Cancelled),
            () = deadline => Err(LlmError::Timeout),
            result = fut => result,
        }
    }
}

// =============================================================================
// LLM GENERATE TRAIT
// =============================================================================

/// Provider-neutral code generation. Enables mocking in tests.
#[async_trait::async_trait]
pub trait LlmGenerate: Send + Sync {
    /// Send `prompt` under the fixed system prompt and return the raw text of
    /// the first choice, untouched.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, is cut short by `ctx`,
    /// or the response is malformed, empty, or carries a provider error.
    async fn generate_code(&self, prompt: &str, ctx: &CallContext) -> Result<String, LlmError>;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
