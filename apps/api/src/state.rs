use std::sync::Arc;

use crate::llm_client::LlmClient;
use crate::screening::MatchScorer;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The store and scorer are trait objects so handlers can be exercised against
/// in-memory fakes in tests.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub store: Arc<dyn ResumeStore>,
    pub scorer: Arc<dyn MatchScorer>,
}
