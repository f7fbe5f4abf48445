use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Idempotent schema bootstrap for the resume embedding store.
///
/// One row per resume id. Composite candidate fields (skills, experience,
/// education) are stored as JSON text and decoded symmetrically on read.
/// The embedding column holds 768-dim vectors from text-embedding-004.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resumes (
            id              UUID PRIMARY KEY,
            candidate_name  TEXT,
            candidate_email TEXT,
            candidate_phone TEXT,
            skills          TEXT NOT NULL DEFAULT '[]',
            experience      TEXT NOT NULL DEFAULT '[]',
            education       TEXT NOT NULL DEFAULT '[]',
            resume_text     TEXT NOT NULL,
            file_name       TEXT NOT NULL,
            uploaded_at     TIMESTAMPTZ NOT NULL DEFAULT now(),
            embedding       vector(768)
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Schema ready (resumes table)");
    Ok(())
}
