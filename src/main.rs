mod error;
mod llm;
mod routes;
mod services;
mod state;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::llm::{LlmClient, LlmGenerate};

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let llm = match LlmClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(code = error::ErrorCode::error_code(&e), error = %e, "LLM client init failed");
            std::process::exit(1);
        }
    };
    tracing::info!(provider = ?llm.provider(), model = llm.model(), "LLM client ready");

    let port = env_or_exit("PORT", DEFAULT_PORT);
    let deadline_secs = env_or_exit("GENERATE_DEADLINE_SECS", state::DEFAULT_GENERATE_DEADLINE_SECS);
    let state = state::AppState::new(Arc::new(llm), Duration::from_secs(deadline_secs));

    let app = routes::app(state);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%port, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(%port, deadline_secs, "promptpage listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

/// Read `key` from the environment, falling back to `default` when unset or
/// blank. An unparsable value is fatal.
fn env_or_exit<T: FromStr>(key: &str, default: T) -> T {
    let Some(raw) = std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
    else {
        return default;
    };
    if let Ok(value) = raw.trim().parse() {
        value
    } else {
        tracing::error!(%key, value = %raw, "invalid environment value");
        std::process::exit(1);
    }
}
