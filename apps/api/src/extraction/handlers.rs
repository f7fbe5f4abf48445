//! Axum route handler for resume upload.

use axum::{extract::Multipart, extract::State, Json};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::info::{extract_info, InfoSource};
use crate::extraction::text::{extract, DocumentFormat, ExtractionTier};
use crate::models::candidate::CandidateInfo;
use crate::state::AppState;
use crate::store::NewResume;

const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_info: Option<CandidateInfo>,
    pub filename: String,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_tier: Option<ExtractionTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_source: Option<InfoSource>,
    /// False when embedding storage failed; the upload itself still succeeds.
    pub stored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_preview: Option<String>,
}

impl UploadResponse {
    /// Unsupported format is a normal negative result, not an error.
    fn unsupported(filename: String, size: usize) -> Self {
        UploadResponse {
            success: false,
            message: Some(format!(
                "Unsupported file format: {filename}. Please upload PDF or DOCX files."
            )),
            resume_id: None,
            candidate_name: None,
            candidate_info: None,
            filename,
            size,
            extraction_tier: None,
            info_source: None,
            stored: false,
            text_preview: None,
        }
    }
}

/// POST /api/v1/resumes
///
/// Full ingestion pipeline: text extraction (with vision fallback) →
/// candidate field extraction → embedding storage. Extraction stages never
/// fail; a storage failure degrades to `stored: false` rather than failing
/// the upload.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut filename: Option<String> = None;
    let mut data: Option<bytes::Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().map(str::to_string);
            data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?,
            );
        }
    }

    let data = data.ok_or_else(|| AppError::Validation("missing 'file' field".to_string()))?;
    let filename = filename.unwrap_or_else(|| "resume".to_string());

    let Some(format) = DocumentFormat::from_file_name(&filename) else {
        return Ok(Json(UploadResponse::unsupported(filename, data.len())));
    };

    let resume_id = Uuid::new_v4();
    info!(%resume_id, filename, size = data.len(), "received resume upload");

    let extracted = extract(&data, format, &state.llm).await;
    let (candidate_info, info_source) = extract_info(&extracted.text, &state.llm).await;

    let resume = NewResume {
        id: resume_id,
        info: candidate_info.clone(),
        resume_text: extracted.text.clone(),
        file_name: filename.clone(),
    };

    let stored = match state.store.store(&resume).await {
        Ok(()) => true,
        Err(e) => {
            warn!(%resume_id, "failed to store resume embeddings: {e}");
            false
        }
    };

    info!(
        %resume_id,
        candidate = candidate_info.display_name(),
        tier = ?extracted.tier,
        stored,
        "resume ingested"
    );

    Ok(Json(UploadResponse {
        success: true,
        message: None,
        resume_id: Some(resume_id),
        candidate_name: Some(candidate_info.display_name().to_string()),
        candidate_info: Some(candidate_info),
        filename,
        size: data.len(),
        extraction_tier: Some(extracted.tier),
        info_source: Some(info_source),
        stored,
        text_preview: Some(preview(&extracted.text)),
    }))
}

fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_text() {
        let text = "a".repeat(500);
        let p = preview(&text);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn test_preview_keeps_short_text_intact() {
        assert_eq!(preview("short resume"), "short resume");
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let text = "é".repeat(300);
        let p = preview(&text);
        assert!(p.starts_with('é'));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_unsupported_response_shape() {
        let resp = UploadResponse::unsupported("notes.txt".into(), 42);
        assert!(!resp.success);
        assert!(resp.message.as_deref().unwrap().contains("Unsupported"));
        assert!(resp.resume_id.is_none());
        assert!(!resp.stored);
    }
}
