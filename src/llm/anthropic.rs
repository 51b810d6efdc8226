//! Anthropic Messages API client.
//!
//! Thin HTTP wrapper for `/v1/messages`. The system prompt travels in the
//! top-level `system` field rather than as a message. Pure parsing in
//! `parse_response` for testability.

use serde_json::Value;
use tracing::warn;

use super::config::{DEFAULT_ANTHROPIC_MODEL, LlmTimeouts};
use super::prompt::build_messages;
use super::types::{CallContext, LlmError, LlmGenerate, Message, Role, request_failed};

const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 8192;

// =============================================================================
// CLIENT
// =============================================================================

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicClient {
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] for a blank key, or
    /// [`LlmError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(api_key: String, model: &str, base_url: &str, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey { var: "ANTHROPIC_API_KEY".into() });
        }
        let model = if model.trim().is_empty() { DEFAULT_ANTHROPIC_MODEL } else { model };
        let http = reqwest::Client::builder()
            .timeout(timeouts.request_timeout())
            .connect_timeout(timeouts.connect_timeout())
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            api_key,
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn send(&self, body: &ApiRequest<'_>) -> Result<String, LlmError> {
        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| request_failed(&e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| request_failed(&e))?;

        if status != 200 {
            warn!(status, body = %text, "anthropic: non-success status");
            return Err(LlmError::ApiResponse { status, body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl LlmGenerate for AnthropicClient {
    async fn generate_code(&self, prompt: &str, ctx: &CallContext) -> Result<String, LlmError> {
        let messages = build_messages(prompt);
        let (system, conversation) = split_system(&messages);
        let body = ApiRequest { model: &self.model, max_tokens: MAX_TOKENS, system: &system, messages: &conversation };
        let text = ctx.run(self.send(&body)).await?;
        parse_response(&text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [&'a Message],
}

/// Separate system messages (joined) from the rest of the conversation.
fn split_system(messages: &[Message]) -> (String, Vec<&Message>) {
    let system = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let rest = messages.iter().filter(|m| m.role != Role::System).collect();
    (system, rest)
}

// =============================================================================
// PARSING
// =============================================================================

/// Concatenate the text blocks of a Messages API body.
pub(crate) fn parse_response(json_text: &str) -> Result<String, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    if !root.is_object() {
        return Err(LlmError::ApiParse("messages: expected a JSON object".to_string()));
    }

    if let Some(err) = root.get("error").filter(|e| !e.is_null()) {
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| err.as_str())
            .unwrap_or("no message")
            .to_string();
        let kind = err
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        return Err(LlmError::Provider { kind, message });
    }

    let Some(blocks) = root.get("content").and_then(Value::as_array) else {
        return Err(LlmError::EmptyResponse);
    };

    let texts: Vec<&str> = blocks
        .iter()
        .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|b| b.get("text").and_then(Value::as_str))
        .collect();
    if texts.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(texts.concat())
}

#[cfg(test)]
#[path = "anthropic_test.rs"]
mod tests;
