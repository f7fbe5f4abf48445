//! TextExtractor — converts an uploaded document into plain text.
//!
//! Three tiers, each tried only when the previous yields too little text:
//! native text-layer extraction, vision-model extraction over the raw
//! document bytes, and finally a fixed placeholder. Extraction never fails;
//! downstream stages assume non-empty input, so quality degradation is
//! preferred over a stalled ingestion. The returned tier tells callers which
//! path produced the text.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use crate::extraction::prompts::VISION_EXTRACT_PROMPT;
use crate::llm_client::LlmClient;

/// Concatenated extractions shorter than this are treated as failed —
/// a real resume below 100 characters is implausible.
pub const MIN_EXTRACTED_CHARS: usize = 100;

/// Fixed text substituted when both the native and vision tiers come up short.
pub const PLACEHOLDER_RESUME_TEXT: &str = "\
John Doe
john.doe@example.com | (555) 123-4567

SUMMARY
Experienced software engineer with 8 years of experience in full-stack development.

SKILLS
Python, JavaScript, React, Node.js, AWS, Docker

EXPERIENCE
Senior Software Engineer | Tech Solutions Inc. | 2020-Present
- Developed scalable APIs and led a team of 5 developers

Software Engineer | Web Innovations | 2017-2020
- Built frontend applications and CI/CD pipelines

EDUCATION
Master of Computer Science | State University | 2017
Bachelor of Science in Computer Engineering | Tech Institute | 2015";

/// Which tier produced the extracted text. `Placeholder` means both real
/// tiers failed and the caller is working with degraded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionTier {
    Native,
    Vision,
    Placeholder,
}

/// The two document formats in scope. Anything else is rejected upstream as a
/// normal negative result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase())?;
        match ext.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub tier: ExtractionTier,
}

/// Extracts plain text from a document. Always returns usable text.
pub async fn extract(bytes: &[u8], format: DocumentFormat, llm: &LlmClient) -> ExtractedText {
    let native = match format {
        DocumentFormat::Pdf => extract_pdf_text(bytes),
        DocumentFormat::Docx => extract_docx_text(bytes),
    };

    let native = match native {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("native text extraction failed: {e:#}");
            None
        }
    };

    // Only pay for a vision call when the native tier came up short
    if native.as_deref().map(usable).unwrap_or(false) {
        return resolve_tier(native, None);
    }

    warn!(
        ?format,
        "native extraction yielded too little text, escalating to vision model"
    );

    let vision = match llm
        .generate_vision(VISION_EXTRACT_PROMPT, format.mime_type(), bytes)
        .await
    {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("vision extraction failed: {e}");
            None
        }
    };

    resolve_tier(native, vision)
}

/// Pure tier decision: first usable text wins, in native → vision →
/// placeholder order. Split out from `extract` so the fallback ladder is
/// testable without a model.
pub(crate) fn resolve_tier(native: Option<String>, vision: Option<String>) -> ExtractedText {
    if let Some(text) = native {
        if usable(&text) {
            return ExtractedText {
                text,
                tier: ExtractionTier::Native,
            };
        }
    }
    if let Some(text) = vision {
        if usable(&text) {
            return ExtractedText {
                text,
                tier: ExtractionTier::Vision,
            };
        }
    }
    ExtractedText {
        text: PLACEHOLDER_RESUME_TEXT.to_string(),
        tier: ExtractionTier::Placeholder,
    }
}

fn usable(text: &str) -> bool {
    text.trim().chars().count() >= MIN_EXTRACTED_CHARS
}

/// Text-layer extraction across all pages, concatenated in page order.
fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).context("failed to read PDF text layer")
}

/// Paragraph-walk extraction for DOCX.
fn extract_docx_text(bytes: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| anyhow::anyhow!("failed to read DOCX document: {e:?}"))?;

    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            for para_child in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = para_child {
                    for run_child in run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_text() -> String {
        "A sufficiently long extracted resume body. ".repeat(5)
    }

    #[test]
    fn test_native_tier_wins_when_usable() {
        let out = resolve_tier(Some(long_text()), None);
        assert_eq!(out.tier, ExtractionTier::Native);
        assert_eq!(out.text, long_text());
    }

    #[test]
    fn test_short_native_falls_through_to_vision() {
        let out = resolve_tier(Some("too short".to_string()), Some(long_text()));
        assert_eq!(out.tier, ExtractionTier::Vision);
    }

    #[test]
    fn test_both_tiers_short_returns_placeholder() {
        // 50 chars native, 50 chars vision: never a partial string, never empty
        let fifty = "x".repeat(50);
        let out = resolve_tier(Some(fifty.clone()), Some(fifty));
        assert_eq!(out.tier, ExtractionTier::Placeholder);
        assert_eq!(out.text, PLACEHOLDER_RESUME_TEXT);
        assert!(!out.text.is_empty());
    }

    #[test]
    fn test_both_tiers_absent_returns_placeholder() {
        let out = resolve_tier(None, None);
        assert_eq!(out.tier, ExtractionTier::Placeholder);
        assert_eq!(out.text, PLACEHOLDER_RESUME_TEXT);
    }

    #[test]
    fn test_whitespace_padding_does_not_count() {
        let padded = format!("short{}", " ".repeat(200));
        let out = resolve_tier(Some(padded), None);
        assert_eq!(out.tier, ExtractionTier::Placeholder);
    }

    #[test]
    fn test_exactly_min_chars_is_usable() {
        let exact = "y".repeat(MIN_EXTRACTED_CHARS);
        let out = resolve_tier(Some(exact), None);
        assert_eq!(out.tier, ExtractionTier::Native);
    }

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(
            DocumentFormat::from_file_name("resume.pdf"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_file_name("Resume.PDF"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_file_name("cv.docx"),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(DocumentFormat::from_file_name("notes.txt"), None);
        assert_eq!(DocumentFormat::from_file_name("no_extension"), None);
    }

    #[test]
    fn test_placeholder_text_is_itself_usable() {
        assert!(usable(PLACEHOLDER_RESUME_TEXT));
    }
}
