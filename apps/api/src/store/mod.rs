//! EmbeddingStore — persistence and nearest-neighbor retrieval over resumes.
//!
//! The `ResumeStore` trait is the seam between handlers and the pgvector
//! implementation; tests swap in an in-memory fake. Composite candidate
//! fields are stored as JSON text and must round-trip exactly.

pub mod handlers;
pub mod pg;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{CandidateInfo, EducationEntry, ExperienceEntry};

/// A resume record as retrieved from the store.
#[derive(Debug, Clone, Serialize)]
pub struct StoredCandidate {
    pub id: Uuid,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
    pub candidate_phone: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub resume_text: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}

impl StoredCandidate {
    pub fn display_name(&self) -> &str {
        self.candidate_name.as_deref().unwrap_or("Unknown")
    }
}

/// A new record to persist. The id is assigned at upload and immutable;
/// re-uploading creates a new record under a new id.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub id: Uuid,
    pub info: CandidateInfo,
    pub resume_text: String,
    pub file_name: String,
}

/// One nearest-neighbor hit. Lower distance means more similar.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub candidate: StoredCandidate,
    pub distance: f64,
    pub match_score: u32,
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Upserts by id — storing the same id twice leaves exactly one record
    /// reflecting the latest write.
    async fn store(&self, resume: &NewResume) -> Result<(), AppError>;

    /// Nearest neighbors for the query text, ascending distance, at most
    /// `top_k` hits (fewer when the store holds fewer records).
    async fn search(&self, query_text: &str, top_k: usize) -> Result<Vec<SearchHit>, AppError>;

    /// Fetches one record. A missing id is an explicit NotFound error, never
    /// a silent empty result.
    async fn get(&self, id: Uuid) -> Result<StoredCandidate, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Metadata codec
// ────────────────────────────────────────────────────────────────────────────

/// Serializes a composite metadata field (skills, experience, education) for
/// storage in a text column.
pub fn encode_metadata_field<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes a composite metadata field. Corrupt stored text decodes to the
/// type's default rather than failing the whole read.
pub fn decode_metadata_field<T: DeserializeOwned + Default>(raw: &str) -> T {
    serde_json::from_str(raw).unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Distance → score mapping
// ────────────────────────────────────────────────────────────────────────────

/// Maps a cosine distance to a 0–100 match score: `round((1 - d) * 100)`,
/// clamped. Cosine distance should sit in [0,1] for normalized embeddings;
/// anything outside is logged as an anomaly and clamped rather than producing
/// an out-of-range score.
pub fn distance_to_score(distance: f64) -> u32 {
    if !distance.is_finite() {
        warn!(distance, "non-finite cosine distance from vector store");
        return 0;
    }
    if !(0.0..=1.0).contains(&distance) {
        warn!(distance, "cosine distance outside [0,1], clamping score");
    }
    ((1.0 - distance) * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Defensive ordering: sorts hits ascending by distance and truncates to
/// `top_k`, regardless of what the backend returned.
pub fn rank_hits(mut hits: Vec<SearchHit>, top_k: usize) -> Vec<SearchHit> {
    hits.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits.truncate(top_k);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_round_trip_preserves_order() {
        let skills = vec!["Python".to_string(), "Go".to_string()];
        let encoded = encode_metadata_field(&skills);
        let decoded: Vec<String> = decode_metadata_field(&encoded);
        assert_eq!(decoded, skills);
    }

    #[test]
    fn test_experience_round_trip_is_exact() {
        let experience = vec![
            ExperienceEntry {
                company: "Acme".into(),
                title: "Engineer".into(),
                duration: "2020-2023".into(),
                description: "Built {things} with \"quotes\"".into(),
            },
            ExperienceEntry {
                company: "Initech".into(),
                title: "Senior Engineer".into(),
                duration: "2023-Present".into(),
                description: String::new(),
            },
        ];
        let encoded = encode_metadata_field(&experience);
        let decoded: Vec<ExperienceEntry> = decode_metadata_field(&encoded);
        assert_eq!(decoded, experience);
    }

    #[test]
    fn test_corrupt_field_decodes_to_default() {
        let decoded: Vec<String> = decode_metadata_field("not json at all");
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_distance_to_score_midrange() {
        assert_eq!(distance_to_score(0.25), 75);
        assert_eq!(distance_to_score(0.0), 100);
        assert_eq!(distance_to_score(1.0), 0);
    }

    #[test]
    fn test_distance_to_score_rounds() {
        assert_eq!(distance_to_score(0.336), 66);
        assert_eq!(distance_to_score(0.335), 67); // 66.5 rounds half away from zero
    }

    #[test]
    fn test_distance_to_score_clamps_out_of_range() {
        assert_eq!(distance_to_score(-0.2), 100);
        assert_eq!(distance_to_score(1.7), 0);
    }

    #[test]
    fn test_distance_to_score_non_finite_is_zero() {
        assert_eq!(distance_to_score(f64::NAN), 0);
        assert_eq!(distance_to_score(f64::INFINITY), 0);
    }

    fn hit(distance: f64) -> SearchHit {
        SearchHit {
            candidate: StoredCandidate {
                id: Uuid::new_v4(),
                candidate_name: None,
                candidate_email: None,
                candidate_phone: None,
                skills: vec![],
                experience: vec![],
                education: vec![],
                resume_text: String::new(),
                file_name: "r.pdf".into(),
                uploaded_at: Utc::now(),
            },
            distance,
            match_score: distance_to_score(distance),
        }
    }

    #[test]
    fn test_rank_hits_orders_ascending_and_truncates() {
        let hits = vec![hit(0.1), hit(0.05), hit(0.3)];
        let ranked = rank_hits(hits, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].distance, 0.05);
        assert_eq!(ranked[1].distance, 0.1);
    }

    #[test]
    fn test_rank_hits_shorter_than_top_k() {
        let ranked = rank_hits(vec![hit(0.4)], 5);
        assert_eq!(ranked.len(), 1);
    }
}
