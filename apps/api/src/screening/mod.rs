//! MatchScorer — LLM relevance scoring with deterministic recommendation
//! banding.
//!
//! The model self-reports a score and a recommendation, but the
//! recommendation is ALWAYS overwritten by `Recommendation::from_score` —
//! banding is a pure function of the (validated) score and is never trusted
//! from the model. Scoring never fails: any model-call or parse failure
//! substitutes the fixed fallback result, tagged with its provenance.

pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::llm_client::LlmClient;
use crate::models::job::JobQuery;
use crate::screening::prompts::{SCREEN_PROMPT_TEMPLATE, SCREEN_SYSTEM};
use crate::store::StoredCandidate;

/// Substituted when the model reports an invalid score, or for the whole
/// result when the call fails outright.
pub const FALLBACK_SCORE: f64 = 55.0;

// ────────────────────────────────────────────────────────────────────────────
// Recommendation banding
// ────────────────────────────────────────────────────────────────────────────

/// Four ordinal bands over the 0–100 score range, inclusive-exclusive
/// boundaries except the top band which includes 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Not Recommended")]
    NotRecommended,
    #[serde(rename = "Maybe")]
    Maybe,
    #[serde(rename = "Recommended")]
    Recommended,
    #[serde(rename = "Highly Recommended")]
    HighlyRecommended,
}

impl Recommendation {
    /// Pure banding function: [80,100] / [65,80) / [40,65) / [0,40).
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Recommendation::HighlyRecommended
        } else if score >= 65.0 {
            Recommendation::Recommended
        } else if score >= 40.0 {
            Recommendation::Maybe
        } else {
            Recommendation::NotRecommended
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::HighlyRecommended => "Highly Recommended",
            Recommendation::Recommended => "Recommended",
            Recommendation::Maybe => "Maybe",
            Recommendation::NotRecommended => "Not Recommended",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Match result
// ────────────────────────────────────────────────────────────────────────────

/// Whether a result came from the model or the fixed fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub candidate_id: Uuid,
    pub candidate_name: String,
    pub score: f64,
    pub recommendation: Recommendation,
    pub matching_points: Vec<String>,
    pub gaps: Vec<String>,
    pub summary: String,
    pub scored_by: ScoreSource,
}

/// Shape of the model's scoring reply. The self-reported recommendation is
/// deserialized only so a disagreement with the banded value can be logged.
#[derive(Debug, Deserialize)]
struct ModelAnalysis {
    match_score: Option<f64>,
    #[serde(default)]
    matching_points: Vec<String>,
    #[serde(default)]
    gaps: Vec<String>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    recommendation: Option<String>,
}

/// Validates a model-reported score: finite and ≥ 0, clamped to 100.
/// Anything else becomes the fallback score.
fn validate_score(raw: Option<f64>) -> f64 {
    match raw {
        Some(s) if s.is_finite() && s >= 0.0 => s.min(100.0),
        other => {
            warn!(?other, "invalid model-reported score, substituting fallback");
            FALLBACK_SCORE
        }
    }
}

fn result_from_analysis(candidate: &StoredCandidate, analysis: ModelAnalysis) -> MatchResult {
    let score = validate_score(analysis.match_score);
    let recommendation = Recommendation::from_score(score);

    if let Some(reported) = &analysis.recommendation {
        if reported != recommendation.as_str() {
            warn!(
                reported,
                banded = recommendation.as_str(),
                score,
                "overwriting model-reported recommendation with banded value"
            );
        }
    }

    MatchResult {
        candidate_id: candidate.id,
        candidate_name: candidate.display_name().to_string(),
        score,
        recommendation,
        matching_points: analysis.matching_points,
        gaps: analysis.gaps,
        summary: analysis.summary,
        scored_by: ScoreSource::Model,
    }
}

/// The fixed result substituted on total model-call failure. Callers always
/// receive a usable, banded result.
fn fallback_result(candidate: &StoredCandidate) -> MatchResult {
    MatchResult {
        candidate_id: candidate.id,
        candidate_name: candidate.display_name().to_string(),
        score: FALLBACK_SCORE,
        recommendation: Recommendation::from_score(FALLBACK_SCORE),
        matching_points: vec![
            "Meets minimum qualifications for consideration".to_string(),
            "Has relevant background in the industry".to_string(),
            "Has some matching skills for the position".to_string(),
        ],
        gaps: vec![
            "May need additional training in specific areas".to_string(),
            "Might need mentoring in some aspects of the role".to_string(),
        ],
        summary: "Based on the available information, this candidate shows potential but a \
                  manual review is recommended to verify fit for the role."
            .to_string(),
        scored_by: ScoreSource::Fallback,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scorer trait + Gemini implementation
// ────────────────────────────────────────────────────────────────────────────

/// The match scorer seam. Carried in `AppState` as `Arc<dyn MatchScorer>` so
/// the batch screening loop can be tested against a canned scorer.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    /// Scores one candidate against a job. Infallible by contract — the
    /// advisory nature of the score makes a fallback cheaper than a retry
    /// or a surfaced error.
    async fn score(&self, job: &JobQuery, candidate: &StoredCandidate) -> MatchResult;
}

pub struct GeminiMatchScorer {
    llm: LlmClient,
}

impl GeminiMatchScorer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl MatchScorer for GeminiMatchScorer {
    async fn score(&self, job: &JobQuery, candidate: &StoredCandidate) -> MatchResult {
        let prompt = SCREEN_PROMPT_TEMPLATE
            .replace("{job_title}", &job.title)
            .replace("{company}", &job.company)
            .replace("{job_description}", &job.description)
            .replace("{resume_text}", &candidate.resume_text);

        // Single attempt, no retry: fallback on any error.
        match self
            .llm
            .generate_json::<ModelAnalysis>(&prompt, SCREEN_SYSTEM, 0.2, 2048)
            .await
        {
            Ok(analysis) => result_from_analysis(candidate, analysis),
            Err(e) => {
                warn!(
                    candidate_id = %candidate.id,
                    "match scoring failed, substituting fallback result: {e}"
                );
                fallback_result(candidate)
            }
        }
    }
}
