//! pgvector-backed `ResumeStore`.
//!
//! One row per resume id; the embedding is computed at write time from the
//! full resume text. Upsert runs as a single `INSERT … ON CONFLICT DO UPDATE`
//! statement, so a concurrent read never observes a partially-written record.
//! The embedding call happens before any database work — no lock or
//! connection is held while a model call is in flight.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pgvector::Vector;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::store::{
    decode_metadata_field, distance_to_score, encode_metadata_field, rank_hits, NewResume,
    ResumeStore, SearchHit, StoredCandidate,
};

pub struct PgVectorStore {
    pool: PgPool,
    llm: LlmClient,
}

impl PgVectorStore {
    pub fn new(pool: PgPool, llm: LlmClient) -> Self {
        Self { pool, llm }
    }

    async fn embed(&self, text: &str) -> Result<Vector, AppError> {
        let values = self
            .llm
            .embed(text)
            .await
            .map_err(|e| AppError::Llm(format!("embedding failed: {e}")))?;
        Ok(Vector::from(values))
    }
}

#[derive(Debug, FromRow)]
struct ResumeRow {
    id: Uuid,
    candidate_name: Option<String>,
    candidate_email: Option<String>,
    candidate_phone: Option<String>,
    skills: String,
    experience: String,
    education: String,
    resume_text: String,
    file_name: String,
    uploaded_at: DateTime<Utc>,
}

impl ResumeRow {
    fn into_candidate(self) -> StoredCandidate {
        StoredCandidate {
            id: self.id,
            candidate_name: self.candidate_name,
            candidate_email: self.candidate_email,
            candidate_phone: self.candidate_phone,
            skills: decode_metadata_field(&self.skills),
            experience: decode_metadata_field(&self.experience),
            education: decode_metadata_field(&self.education),
            resume_text: self.resume_text,
            file_name: self.file_name,
            uploaded_at: self.uploaded_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SearchRow {
    #[sqlx(flatten)]
    resume: ResumeRow,
    distance: f64,
}

const RESUME_COLUMNS: &str = "id, candidate_name, candidate_email, candidate_phone, \
     skills, experience, education, resume_text, file_name, uploaded_at";

#[async_trait]
impl ResumeStore for PgVectorStore {
    async fn store(&self, resume: &NewResume) -> Result<(), AppError> {
        let embedding = self.embed(&resume.resume_text).await?;
        upsert_resume(&self.pool, resume, embedding).await
    }

    async fn search(&self, query_text: &str, top_k: usize) -> Result<Vec<SearchHit>, AppError> {
        let embedding = self.embed(query_text).await?;
        nearest_resumes(&self.pool, &embedding, top_k).await
    }

    async fn get(&self, id: Uuid) -> Result<StoredCandidate, AppError> {
        fetch_resume(&self.pool, id).await
    }
}

// SQL paths split from the trait impl so they can be exercised against a test
// database with fixed embeddings, no model call involved.

async fn upsert_resume(
    pool: &PgPool,
    resume: &NewResume,
    embedding: Vector,
) -> Result<(), AppError> {
    let info = &resume.info;

    sqlx::query(
        r#"
        INSERT INTO resumes
            (id, candidate_name, candidate_email, candidate_phone,
             skills, experience, education, resume_text, file_name, uploaded_at, embedding)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now(), $10)
        ON CONFLICT (id) DO UPDATE SET
            candidate_name  = EXCLUDED.candidate_name,
            candidate_email = EXCLUDED.candidate_email,
            candidate_phone = EXCLUDED.candidate_phone,
            skills          = EXCLUDED.skills,
            experience      = EXCLUDED.experience,
            education       = EXCLUDED.education,
            resume_text     = EXCLUDED.resume_text,
            file_name       = EXCLUDED.file_name,
            uploaded_at     = EXCLUDED.uploaded_at,
            embedding       = EXCLUDED.embedding
        "#,
    )
    .bind(resume.id)
    .bind(&info.candidate_name)
    .bind(&info.email)
    .bind(&info.phone)
    .bind(encode_metadata_field(&info.skills))
    .bind(encode_metadata_field(&info.experience))
    .bind(encode_metadata_field(&info.education))
    .bind(&resume.resume_text)
    .bind(&resume.file_name)
    .bind(embedding)
    .execute(pool)
    .await?;

    Ok(())
}

async fn nearest_resumes(
    pool: &PgPool,
    embedding: &Vector,
    top_k: usize,
) -> Result<Vec<SearchHit>, AppError> {
    let rows: Vec<SearchRow> = sqlx::query_as(&format!(
        "SELECT {RESUME_COLUMNS}, (embedding <=> $1)::float8 AS distance \
         FROM resumes WHERE embedding IS NOT NULL \
         ORDER BY embedding <=> $1 LIMIT $2"
    ))
    .bind(embedding)
    .bind(top_k as i64)
    .fetch_all(pool)
    .await?;

    let hits = rows
        .into_iter()
        .map(|row| SearchHit {
            distance: row.distance,
            match_score: distance_to_score(row.distance),
            candidate: row.resume.into_candidate(),
        })
        .collect();

    Ok(rank_hits(hits, top_k))
}

async fn fetch_resume(pool: &PgPool, id: Uuid) -> Result<StoredCandidate, AppError> {
    let row: Option<ResumeRow> =
        sqlx::query_as(&format!("SELECT {RESUME_COLUMNS} FROM resumes WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    row.map(ResumeRow::into_candidate)
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found in database")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use crate::models::candidate::CandidateInfo;

    fn axis_vector(hot: usize) -> Vector {
        let mut values = vec![0.0_f32; 768];
        values[hot] = 1.0;
        Vector::from(values)
    }

    fn resume(id: Uuid, name: &str, text: &str) -> NewResume {
        NewResume {
            id,
            info: CandidateInfo {
                candidate_name: Some(name.to_string()),
                ..CandidateInfo::default()
            },
            resume_text: text.to_string(),
            file_name: "resume.pdf".to_string(),
        }
    }

    #[sqlx::test]
    async fn test_storing_same_id_twice_keeps_latest_write(pool: PgPool) {
        init_schema(&pool).await.unwrap();
        let id = Uuid::new_v4();

        upsert_resume(&pool, &resume(id, "Jane Roe", "first version"), axis_vector(0))
            .await
            .unwrap();
        upsert_resume(&pool, &resume(id, "Jane R. Roe", "second version"), axis_vector(1))
            .await
            .unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let stored = fetch_resume(&pool, id).await.unwrap();
        assert_eq!(stored.resume_text, "second version");
        assert_eq!(stored.candidate_name.as_deref(), Some("Jane R. Roe"));
    }

    #[sqlx::test]
    async fn test_search_after_reupload_ranks_on_latest_embedding(pool: PgPool) {
        init_schema(&pool).await.unwrap();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        upsert_resume(&pool, &resume(a, "A", "resume a"), axis_vector(0))
            .await
            .unwrap();
        upsert_resume(&pool, &resume(b, "B", "resume b"), axis_vector(1))
            .await
            .unwrap();
        // Re-upload moves resume a onto the axis the query will sit on
        upsert_resume(&pool, &resume(a, "A", "resume a, revised"), axis_vector(2))
            .await
            .unwrap();

        let hits = nearest_resumes(&pool, &axis_vector(2), 5).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].candidate.id, a);
        assert_eq!(hits[0].candidate.resume_text, "resume a, revised");
        assert!(hits[0].distance < hits[1].distance);
    }

    #[sqlx::test]
    async fn test_fetch_missing_id_is_not_found(pool: PgPool) {
        init_schema(&pool).await.unwrap();
        let err = fetch_resume(&pool, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
