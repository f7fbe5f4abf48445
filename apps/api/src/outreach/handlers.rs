//! Axum route handler for candidate outreach.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::outreach::prompts::EngageContext;
use crate::outreach::{compose, EmailDraft, OutreachBundle, OutreachKind};
use crate::state::AppState;

/// Suitability cutoff when the caller does not decide explicitly. Matches the
/// lower bound of the "Recommended" screening band.
const SUITABLE_SCORE: f64 = 65.0;

#[derive(Debug, Deserialize)]
pub struct EngageRequest {
    pub candidate_id: Uuid,
    pub candidate_name: String,
    pub job_title: String,
    pub job_description: String,
    pub company_name: String,
    pub recruiter_name: String,
    pub match_score: f64,
    /// Overrides the score-based suitability decision when present.
    #[serde(default)]
    pub is_suitable: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct EngageResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub candidate_id: Uuid,
    /// Which bundle the recruiter is expected to send.
    pub is_acceptance: bool,
    pub match_score: f64,
    /// The email of the bundle selected by `is_acceptance`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailDraft>,
    /// The LinkedIn message of the bundle selected by `is_acceptance`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptance: Option<OutreachBundle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<OutreachBundle>,
}

/// POST /api/v1/outreach/engage
///
/// Drafts both an invitation and a rejection bundle so the recruiter can
/// review either before sending; `is_acceptance` marks which one the
/// suitability decision points at, and the top-level email/LinkedIn pair is
/// that bundle's. A model failure degrades to `success: false` with a
/// message rather than an error status.
pub async fn handle_engage(
    State(state): State<AppState>,
    Json(request): Json<EngageRequest>,
) -> Result<Json<EngageResponse>, AppError> {
    if request.candidate_name.trim().is_empty() {
        return Err(AppError::Validation("candidate name is required".to_string()));
    }
    if request.job_title.trim().is_empty() {
        return Err(AppError::Validation("job title is required".to_string()));
    }

    let is_acceptance = decide_acceptance(request.is_suitable, request.match_score);

    let ctx = EngageContext {
        candidate_name: &request.candidate_name,
        job_title: &request.job_title,
        job_description: &request.job_description,
        company_name: &request.company_name,
        recruiter_name: &request.recruiter_name,
        match_score: request.match_score,
    };

    let outcome = draft_both(&state.llm, &ctx).await;

    info!(
        candidate_id = %request.candidate_id,
        candidate = request.candidate_name,
        is_acceptance,
        success = outcome.is_ok(),
        "drafted outreach communications"
    );

    Ok(Json(engage_response(&request, is_acceptance, outcome)))
}

async fn draft_both(
    llm: &LlmClient,
    ctx: &EngageContext<'_>,
) -> Result<(OutreachBundle, OutreachBundle), AppError> {
    let acceptance = compose(llm, OutreachKind::Invitation, ctx).await?;
    let rejection = compose(llm, OutreachKind::Rejection, ctx).await?;
    Ok((acceptance, rejection))
}

/// Pure suitability decision: an explicit override wins, otherwise the score
/// is compared against the Recommended-band cutoff.
fn decide_acceptance(is_suitable: Option<bool>, match_score: f64) -> bool {
    is_suitable.unwrap_or(match_score >= SUITABLE_SCORE)
}

/// Builds the response from the drafting outcome. Drafting failures are a
/// degraded-but-successful response, never a transport error.
fn engage_response(
    request: &EngageRequest,
    is_acceptance: bool,
    outcome: Result<(OutreachBundle, OutreachBundle), AppError>,
) -> EngageResponse {
    match outcome {
        Ok((acceptance, rejection)) => {
            let selected = if is_acceptance { &acceptance } else { &rejection };
            EngageResponse {
                success: true,
                message: None,
                candidate_id: request.candidate_id,
                is_acceptance,
                match_score: request.match_score,
                email: Some(selected.email.clone()),
                linkedin_message: Some(selected.linkedin_message.clone()),
                acceptance: Some(acceptance),
                rejection: Some(rejection),
            }
        }
        Err(e) => {
            warn!(
                candidate_id = %request.candidate_id,
                "outreach drafting failed, returning degraded response: {e}"
            );
            EngageResponse {
                success: false,
                message: Some(format!("Failed to draft outreach communications: {e}")),
                candidate_id: request.candidate_id,
                is_acceptance,
                match_score: request.match_score,
                email: None,
                linkedin_message: None,
                acceptance: None,
                rejection: None,
            }
        }
    }
}
