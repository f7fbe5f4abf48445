//! Axum route handlers for candidate retrieval.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{EducationEntry, ExperienceEntry};
use crate::models::job::JobQuery;
use crate::state::AppState;
use crate::store::{SearchHit, StoredCandidate};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(flatten)]
    pub job: JobQuery,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

/// Search responses omit the full resume text — recruiters fetch a single
/// candidate for that.
#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub id: Uuid,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
    pub candidate_phone: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub file_name: String,
    pub match_score: u32,
}

impl From<SearchHit> for SearchResultItem {
    fn from(hit: SearchHit) -> Self {
        let c = hit.candidate;
        SearchResultItem {
            id: c.id,
            candidate_name: c.candidate_name,
            candidate_email: c.candidate_email,
            candidate_phone: c.candidate_phone,
            skills: c.skills,
            experience: c.experience,
            education: c.education,
            file_name: c.file_name,
            match_score: hit.match_score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub total_matches: usize,
    pub candidates: Vec<SearchResultItem>,
}

/// POST /api/v1/candidates/search
///
/// Embeds the job description and returns the nearest stored resumes,
/// best match first.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    if request.job.description.trim().is_empty() {
        return Err(AppError::Validation(
            "job description cannot be empty".to_string(),
        ));
    }

    let hits = state
        .store
        .search(&request.job.search_text(), request.top_k)
        .await?;

    let candidates: Vec<SearchResultItem> = hits.into_iter().map(Into::into).collect();

    Ok(Json(SearchResponse {
        total_matches: candidates.len(),
        candidates,
    }))
}

/// GET /api/v1/candidates/:id
///
/// Returns the full stored record including resume text. 404 on unknown id.
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredCandidate>, AppError> {
    let candidate = state.store.get(id).await?;
    Ok(Json(candidate))
}
