use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_to_openai() {
    let cfg = LlmConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
    assert_eq!(cfg.provider, LlmProviderKind::OpenAi);
    assert_eq!(cfg.api_key, "sk-test");
    assert_eq!(cfg.model, DEFAULT_OPENAI_MODEL);
    assert_eq!(cfg.base_url, DEFAULT_OPENAI_BASE_URL);
    assert_eq!(cfg.timeouts, LlmTimeouts::default());
    assert_eq!(cfg.timeouts.request_secs, 60);
}

#[test]
fn parses_overrides() {
    let cfg = LlmConfig::from_lookup(lookup_from(&[
        ("OPENAI_API_KEY", "sk-test"),
        ("LLM_MODEL", "gpt-4"),
        ("LLM_BASE_URL", "https://example.test/v1/"),
        ("LLM_CONNECT_TIMEOUT_SECS", "3"),
    ]))
    .unwrap();
    assert_eq!(cfg.model, "gpt-4");
    assert_eq!(cfg.base_url, "https://example.test/v1");
    assert_eq!(cfg.timeouts, LlmTimeouts { request_secs: LLM_REQUEST_TIMEOUT_SECS, connect_secs: 3 });
}

#[test]
fn anthropic_uses_its_own_defaults() {
    let cfg = LlmConfig::from_lookup(lookup_from(&[
        ("LLM_PROVIDER", "anthropic"),
        ("ANTHROPIC_API_KEY", "sk-ant"),
    ]))
    .unwrap();
    assert_eq!(cfg.provider, LlmProviderKind::Anthropic);
    assert_eq!(cfg.model, DEFAULT_ANTHROPIC_MODEL);
    assert_eq!(cfg.base_url, DEFAULT_ANTHROPIC_BASE_URL);
}

#[test]
fn key_var_can_be_renamed() {
    let cfg = LlmConfig::from_lookup(lookup_from(&[("LLM_API_KEY_ENV", "MY_KEY"), ("MY_KEY", "secret")])).unwrap();
    assert_eq!(cfg.api_key, "secret");
}

#[test]
fn missing_key_errors() {
    let err = LlmConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == "OPENAI_API_KEY"));
}

#[test]
fn blank_key_errors() {
    let err = LlmConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "   ")])).unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { .. }));
}

#[test]
fn blank_model_falls_back_to_default() {
    let cfg = LlmConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk"), ("LLM_MODEL", "")])).unwrap();
    assert_eq!(cfg.model, DEFAULT_OPENAI_MODEL);
}

#[test]
fn invalid_connect_timeout_uses_default() {
    let cfg =
        LlmConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk"), ("LLM_CONNECT_TIMEOUT_SECS", "soon")])).unwrap();
    assert_eq!(cfg.timeouts.connect_secs, DEFAULT_LLM_CONNECT_TIMEOUT_SECS);
}

#[test]
fn unknown_provider_errors() {
    let err = LlmConfig::from_lookup(lookup_from(&[("LLM_PROVIDER", "bad"), ("OPENAI_API_KEY", "sk")]))
        .unwrap_err()
        .to_string();
    assert!(err.contains("unknown LLM_PROVIDER"));
}

#[test]
fn request_timeout_never_exceeds_hard_bound() {
    let long = LlmTimeouts { request_secs: 600, connect_secs: 5 };
    assert_eq!(long.request_timeout(), std::time::Duration::from_secs(LLM_REQUEST_TIMEOUT_SECS));
    assert_eq!(long.connect_timeout(), std::time::Duration::from_secs(5));

    let short = LlmTimeouts { request_secs: 15, ..LlmTimeouts::default() };
    assert_eq!(short.request_timeout(), std::time::Duration::from_secs(15));
}
