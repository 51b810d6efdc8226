//! Generation endpoint.
//!
//! Each request gets its own cancellation token. Axum drops the handler
//! future when the client goes away, which drops the guard and cancels the
//! provider call still in flight. Log lines for one request share a
//! `request_id` span field.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Json;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, warn};
use uuid::Uuid;

use crate::llm::{CallContext, LlmError};
use crate::services::generate::{GenerateError, GenerationRequest, GenerationResponse, generate};
use crate::state::AppState;

/// `POST /api/generate`
///
/// Bodies axum cannot decode still answer with a `GenerationResponse` and 400.
pub async fn generate_page(
    State(state): State<AppState>,
    body: Result<Json<GenerationRequest>, JsonRejection>,
) -> (StatusCode, Json<GenerationResponse>) {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(status = %rejection.status(), error = %rejection.body_text(), "generate: rejected request body");
            return (StatusCode::BAD_REQUEST, Json(GenerationResponse::failed(rejection.body_text())));
        }
    };

    let token = CancellationToken::new();
    let _guard = token.clone().drop_guard();
    let ctx = CallContext::new()
        .with_cancel(token)
        .with_timeout(state.deadline);

    let request_id = Uuid::new_v4();
    let result = generate(state.llm.as_ref(), &request, &ctx)
        .instrument(tracing::info_span!("generate", %request_id))
        .await;
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => error_status(e),
    };
    (status, Json(GenerationResponse::from(result)))
}

pub(crate) fn error_status(err: &GenerateError) -> StatusCode {
    match err {
        GenerateError::EmptyPrompt => StatusCode::BAD_REQUEST,
        GenerateError::Llm(LlmError::Timeout | LlmError::Cancelled) => StatusCode::GATEWAY_TIMEOUT,
        GenerateError::Llm(_) | GenerateError::Extract(_) => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
