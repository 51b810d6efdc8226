use super::*;
use config::LlmTimeouts;
use test_helpers::spawn_provider_double;
use axum::http::StatusCode;

fn config(provider: LlmProviderKind, base_url: &str) -> LlmConfig {
    LlmConfig {
        provider,
        api_key: "sk-test".into(),
        model: String::new(),
        base_url: base_url.into(),
        timeouts: LlmTimeouts::default(),
    }
}

#[test]
fn from_config_selects_openai() {
    let client = LlmClient::from_config(config(LlmProviderKind::OpenAi, "https://api.openai.com/v1")).unwrap();
    assert_eq!(client.provider(), LlmProviderKind::OpenAi);
    assert_eq!(client.model(), config::DEFAULT_OPENAI_MODEL);
}

#[test]
fn from_config_selects_anthropic() {
    let client = LlmClient::from_config(config(LlmProviderKind::Anthropic, "https://api.anthropic.com/v1")).unwrap();
    assert_eq!(client.provider(), LlmProviderKind::Anthropic);
    assert_eq!(client.model(), config::DEFAULT_ANTHROPIC_MODEL);
}

#[test]
fn from_config_blank_key_errors() {
    let mut cfg = config(LlmProviderKind::OpenAi, "https://api.openai.com/v1");
    cfg.api_key = String::new();
    assert!(matches!(LlmClient::from_config(cfg), Err(LlmError::MissingApiKey { .. })));
}

#[tokio::test]
async fn dispatch_reaches_configured_provider() {
    let body = serde_json::json!({ "choices": [{ "message": { "role": "assistant", "content": "text" } }] }).to_string();
    let double = spawn_provider_double("/v1/chat/completions", StatusCode::OK, &body).await;
    let client = LlmClient::from_config(config(LlmProviderKind::OpenAi, &double.base_url)).unwrap();

    let text = client
        .generate_code("prompt", &CallContext::new())
        .await
        .unwrap();
    assert_eq!(text, "text");
    assert_eq!(double.recorded().len(), 1);
}
