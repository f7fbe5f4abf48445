mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod outreach;
mod routes;
mod screening;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::screening::GeminiMatchScorer;
use crate::state::AppState;
use crate::store::pg::PgVectorStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentScout API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and the resumes table (pgvector)
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // Initialize LLM client — the single entry point for all Gemini calls
    let llm = LlmClient::new(config.google_api_key.clone());
    info!(
        "LLM client initialized (generation: {}, embedding: {})",
        llm_client::GENERATION_MODEL,
        llm_client::EMBEDDING_MODEL
    );

    // Embedding store and match scorer behind trait seams so handlers stay
    // testable against in-memory fakes.
    let store = Arc::new(PgVectorStore::new(db, llm.clone()));
    let scorer = Arc::new(GeminiMatchScorer::new(llm.clone()));

    let state = AppState { llm, store, scorer };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
