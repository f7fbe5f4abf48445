//! Axum route handlers for batch resume screening.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobQuery;
use crate::screening::{MatchResult, MatchScorer};
use crate::state::AppState;
use crate::store::ResumeStore;

#[derive(Debug, Deserialize)]
pub struct ScreeningRequest {
    pub job_title: String,
    pub company: String,
    pub job_description: String,
    #[serde(default)]
    pub skills_required: Vec<String>,
    /// Resume ids to screen, as returned by upload.
    pub resumes: Vec<Uuid>,
}

/// One per-resume outcome. Failures carry an error message; the batch itself
/// always succeeds at the transport level.
#[derive(Debug, Serialize)]
pub struct ScreeningItem {
    pub resume_id: Uuid,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<MatchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub results: Vec<ScreeningItem>,
}

/// POST /api/v1/screening
///
/// Screens each listed resume against the job description. Per-resume
/// isolation: a missing id or failed lookup marks only that item failed.
pub async fn handle_screen(
    State(state): State<AppState>,
    Json(request): Json<ScreeningRequest>,
) -> Result<Json<ScreeningResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job description is required".to_string(),
        ));
    }
    if request.resumes.is_empty() {
        return Err(AppError::Validation("no resumes provided".to_string()));
    }

    let job = JobQuery {
        title: request.job_title,
        company: request.company,
        description: request.job_description,
        skills_required: request.skills_required,
        experience_level: String::new(),
        location: String::new(),
    };

    let results = screen_batch(
        state.store.as_ref(),
        state.scorer.as_ref(),
        &job,
        &request.resumes,
    )
    .await;

    Ok(Json(ScreeningResponse { results }))
}

/// The batch loop, over the trait seams so isolation is testable without
/// Postgres or a model. Scoring itself is infallible; only the store lookup
/// can fail an item.
pub(crate) async fn screen_batch(
    store: &dyn ResumeStore,
    scorer: &dyn MatchScorer,
    job: &JobQuery,
    resume_ids: &[Uuid],
) -> Vec<ScreeningItem> {
    let mut results = Vec::with_capacity(resume_ids.len());

    for &resume_id in resume_ids {
        match store.get(resume_id).await {
            Ok(candidate) => {
                let analysis = scorer.score(job, &candidate).await;
                results.push(ScreeningItem {
                    resume_id,
                    success: true,
                    analysis: Some(analysis),
                    error: None,
                });
            }
            Err(e) => {
                results.push(ScreeningItem {
                    resume_id,
                    success: false,
                    analysis: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;

    use crate::screening::{Recommendation, ScoreSource};
    use crate::store::{NewResume, SearchHit, StoredCandidate};

    /// In-memory store fake: `get` resolves from a map, mirroring the
    /// NotFound contract of the real store.
    struct FakeStore {
        records: HashMap<Uuid, StoredCandidate>,
    }

    #[async_trait]
    impl ResumeStore for FakeStore {
        async fn store(&self, _resume: &NewResume) -> Result<(), AppError> {
            Ok(())
        }

        async fn search(
            &self,
            _query_text: &str,
            _top_k: usize,
        ) -> Result<Vec<SearchHit>, AppError> {
            Ok(vec![])
        }

        async fn get(&self, id: Uuid) -> Result<StoredCandidate, AppError> {
            self.records
                .get(&id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found in database")))
        }
    }

    /// Canned scorer: fixed score, banded recommendation.
    struct FakeScorer {
        score: f64,
    }

    #[async_trait]
    impl MatchScorer for FakeScorer {
        async fn score(&self, _job: &JobQuery, candidate: &StoredCandidate) -> MatchResult {
            MatchResult {
                candidate_id: candidate.id,
                candidate_name: candidate.display_name().to_string(),
                score: self.score,
                recommendation: Recommendation::from_score(self.score),
                matching_points: vec![],
                gaps: vec![],
                summary: String::new(),
                scored_by: ScoreSource::Model,
            }
        }
    }

    fn stored(id: Uuid) -> StoredCandidate {
        StoredCandidate {
            id,
            candidate_name: Some("Jane Roe".into()),
            candidate_email: None,
            candidate_phone: None,
            skills: vec![],
            experience: vec![],
            education: vec![],
            resume_text: "resume body".into(),
            file_name: "jane.pdf".into(),
            uploaded_at: Utc::now(),
        }
    }

    fn job() -> JobQuery {
        JobQuery {
            title: "Engineer".into(),
            company: "Acme".into(),
            description: "Build things".into(),
            skills_required: vec![],
            experience_level: String::new(),
            location: String::new(),
        }
    }

    #[tokio::test]
    async fn test_batch_isolation_missing_middle_id() {
        let (r1, r2, r3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let store = FakeStore {
            records: HashMap::from([(r1, stored(r1)), (r3, stored(r3))]),
        };
        let scorer = FakeScorer { score: 75.0 };

        let results = screen_batch(&store, &scorer, &job(), &[r1, r2, r3]).await;

        assert_eq!(results.len(), 3);
        assert!(results[0].success);
        assert!(!results[1].success);
        assert!(results[1].error.as_deref().unwrap().contains("not found"));
        assert!(results[1].analysis.is_none());
        assert!(results[2].success);
        assert_eq!(results[0].analysis.as_ref().unwrap().score, 75.0);
    }

    #[tokio::test]
    async fn test_batch_preserves_request_order() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let store = FakeStore {
            records: ids.iter().map(|&id| (id, stored(id))).collect(),
        };
        let scorer = FakeScorer { score: 50.0 };

        let results = screen_batch(&store, &scorer, &job(), &ids).await;
        let returned: Vec<Uuid> = results.iter().map(|r| r.resume_id).collect();
        assert_eq!(returned, ids);
    }

    #[tokio::test]
    async fn test_all_missing_still_returns_one_item_per_id() {
        let store = FakeStore {
            records: HashMap::new(),
        };
        let scorer = FakeScorer { score: 50.0 };
        let ids = [Uuid::new_v4(), Uuid::new_v4()];

        let results = screen_batch(&store, &scorer, &job(), &ids).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.success));
    }
}
