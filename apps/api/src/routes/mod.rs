pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{extraction, outreach, screening, store};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Ingestion
        .route("/api/v1/resumes", post(extraction::handlers::handle_upload))
        // Candidate search
        .route(
            "/api/v1/candidates/search",
            post(store::handlers::handle_search),
        )
        .route(
            "/api/v1/candidates/:id",
            get(store::handlers::handle_get_candidate),
        )
        // Screening
        .route("/api/v1/screening", post(screening::handlers::handle_screen))
        // Outreach
        .route(
            "/api/v1/outreach/engage",
            post(outreach::handlers::handle_engage),
        )
        .with_state(state)
}
