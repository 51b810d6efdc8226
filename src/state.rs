//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the one LLM client built at startup and the per-request
//! deadline handed to the orchestrator.

use std::sync::Arc;
use std::time::Duration;

use crate::llm::LlmGenerate;

pub const DEFAULT_GENERATE_DEADLINE_SECS: u64 = 60;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LlmGenerate>,
    pub deadline: Duration,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmGenerate>, deadline: Duration) -> Self {
        Self { llm, deadline }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
