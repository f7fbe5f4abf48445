//! InfoExtractor — structured candidate fields from extracted resume text.

use serde::Serialize;
use tracing::warn;

use crate::extraction::prompts::{INFO_EXTRACT_PROMPT_TEMPLATE, INFO_EXTRACT_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::candidate::CandidateInfo;

/// Whether candidate fields came from the model or the fixed placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoSource {
    Model,
    Placeholder,
}

/// Extracts candidate fields from resume text. Never fails: any model-call or
/// parse failure degrades to the placeholder record so ingestion continues.
pub async fn extract_info(resume_text: &str, llm: &LlmClient) -> (CandidateInfo, InfoSource) {
    let prompt = INFO_EXTRACT_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);

    match llm
        .generate_json::<CandidateInfo>(&prompt, INFO_EXTRACT_SYSTEM, 0.1, 1024)
        .await
    {
        Ok(info) => (info, InfoSource::Model),
        Err(e) => {
            warn!("candidate field extraction failed, using placeholder record: {e}");
            (CandidateInfo::placeholder(), InfoSource::Placeholder)
        }
    }
}
