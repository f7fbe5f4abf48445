//! LLM Client — the single point of entry for all Gemini API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! All model interactions (text generation, vision extraction, embeddings)
//! MUST go through this module.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod json;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Model used for all text and vision generation calls.
pub const GENERATION_MODEL: &str = "gemini-1.5-flash";
/// Model used for embedding resume and query text (768 dimensions).
pub const EMBEDDING_MODEL: &str = "text-embedding-004";

/// Matching pipeline scores are advisory, so a failed call degrades to a
/// fallback value downstream instead of being retried. One attempt per call,
/// bounded by this timeout.
const CALL_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no JSON object found in model reply")]
    MissingJson,

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (Gemini generateContent / embedContent)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest<'a> {
    content: Content<'a>,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by all services.
/// Wraps the Gemini REST API with typed request/response structs and
/// structured-output recovery helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(CALL_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Generates text for a prompt with an optional system instruction.
    /// `generate(prompt, system_instruction, temperature, max_output_tokens) → text`.
    pub async fn generate(
        &self,
        prompt: &str,
        system: &str,
        temperature: f32,
        max_output_tokens: u32,
    ) -> Result<String, LlmError> {
        let request = GenerateContentRequest {
            system_instruction: (!system.is_empty()).then(|| Content {
                parts: vec![Part::Text { text: system }],
            }),
            contents: vec![Content {
                parts: vec![Part::Text { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens,
            },
        };

        self.call_generate(&request).await
    }

    /// Generates text from a prompt plus an inline document (vision path).
    /// The document bytes are submitted base64-encoded with their MIME type;
    /// Gemini accepts PDFs and images directly, so no rasterization step.
    pub async fn generate_vision(
        &self,
        prompt: &str,
        mime_type: &'static str,
        document: &[u8],
    ) -> Result<String, LlmError> {
        use base64::Engine;

        let request = GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type,
                            data: base64::engine::general_purpose::STANDARD.encode(document),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 4096,
            },
        };

        self.call_generate(&request).await
    }

    /// Embeds text for similarity search. Returns a 768-dim vector.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let url = format!(
            "{GEMINI_API_BASE}/{EMBEDDING_MODEL}:embedContent?key={}",
            self.api_key
        );
        let request = EmbedContentRequest {
            content: Content {
                parts: vec![Part::Text { text }],
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status.as_u16(), response.text().await.unwrap_or_default()));
        }

        let body: EmbedContentResponse = response.json().await?;
        Ok(body.embedding.values)
    }

    /// Convenience method that generates text and recovers a JSON object from
    /// the reply, tolerating code fences and preamble/postamble chatter.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
        temperature: f32,
        max_output_tokens: u32,
    ) -> Result<T, LlmError> {
        let text = self
            .generate(prompt, system, temperature, max_output_tokens)
            .await?;

        let cleaned = json::strip_code_fences(&text);
        let object = json::extract_json_object(cleaned).ok_or(LlmError::MissingJson)?;
        serde_json::from_str(object).map_err(LlmError::Parse)
    }

    async fn call_generate(&self, request: &GenerateContentRequest<'_>) -> Result<String, LlmError> {
        let url = format!(
            "{GEMINI_API_BASE}/{GENERATION_MODEL}:generateContent?key={}",
            self.api_key
        );

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(api_error(status.as_u16(), response.text().await.unwrap_or_default()));
        }

        let body: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &body.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={:?}, output_tokens={:?}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        body.text().ok_or(LlmError::EmptyContent)
    }
}

fn api_error(status: u16, body: String) -> LlmError {
    // Try to parse the provider's structured error message
    let message = serde_json::from_str::<GeminiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}
