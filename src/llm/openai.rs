//! OpenAI-compatible chat completions client.
//!
//! Thin HTTP wrapper for `/chat/completions`. One POST per call, no retries.
//! Pure parsing in `parse_chat_completions_text` for testability.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::config::{DEFAULT_OPENAI_MODEL, LlmTimeouts};
use super::prompt::build_messages;
use super::types::{CallContext, LlmError, LlmGenerate, Message, request_failed};

// =============================================================================
// CLIENT
// =============================================================================

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    /// Build a client. The underlying connection pool lives as long as the
    /// client, so build once and share.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] for a blank key, or
    /// [`LlmError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(api_key: String, model: &str, base_url: &str, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey { var: "OPENAI_API_KEY".into() });
        }
        let model = if model.trim().is_empty() { DEFAULT_OPENAI_MODEL } else { model };
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

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
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
            warn!(status, body = %text, "openai: non-success status");
            return Err(LlmError::ApiResponse { status, body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl LlmGenerate for OpenAiClient {
    async fn generate_code(&self, prompt: &str, ctx: &CallContext) -> Result<String, LlmError> {
        let messages = build_messages(prompt);
        let body = CcRequest { model: &self.model, messages: &messages };
        let text = ctx
            .run(self.send_json("/chat/completions", &body))
            .await?;
        parse_chat_completions_text(&text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

/// Pull the first choice's text out of a chat completions body.
///
/// A populated `error` wins over `choices`. A missing or empty `choices`
/// array is [`LlmError::EmptyResponse`]; anything that is not the expected
/// shape is [`LlmError::ApiParse`].
pub(crate) fn parse_chat_completions_text(json_text: &str) -> Result<String, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    if !root.is_object() {
        return Err(LlmError::ApiParse("chat_completions: expected a JSON object".to_string()));
    }

    if let Some(err) = provider_error(&root) {
        return Err(err);
    }

    let Some(choice) = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
    else {
        return Err(LlmError::EmptyResponse);
    };

    match choice.get("message").and_then(|m| m.get("content")) {
        Some(Value::String(text)) => Ok(text.clone()),
        // Some compatible servers return content as typed parts.
        Some(Value::Array(parts)) => Ok(parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect()),
        _ => Err(LlmError::ApiParse("chat_completions: choices[0].message.content is not text".to_string())),
    }
}

fn provider_error(root: &Value) -> Option<LlmError> {
    match root.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(LlmError::Provider { kind: "unknown".to_string(), message: message.clone() }),
        err => {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("no message")
                .to_string();
            let kind = err
                .get("type")
                .or_else(|| err.get("code"))
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string();
            Some(LlmError::Provider { kind, message })
        }
    }
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
