//! Model interaction: build the redesign request and call the endpoint.
//!
//! This module is intentionally thin — all prompt engineering lives in
//! [`crate::prompts`] and all response interpretation in
//! [`crate::pipeline::parse`], so the wire exchange can change without
//! touching either.
//!
//! ## One call, no retry
//!
//! A redesign is a single, non-streamed request/response exchange: the call
//! either produces the complete structured text or fails entirely. There is
//! no partial result to resume from, so failures surface immediately as
//! service errors and the user re-submits with a clearer source.
//!
//! ## The `DesignModel` seam
//!
//! The endpoint is reached through the object-safe [`DesignModel`] trait
//! rather than a concrete client, so tests and embedders can substitute a
//! fake without any network. [`GeminiStudio`] is the production
//! implementation of the `generateContent` exchange.

use crate::error::RedesignError;
use crate::pipeline::encode::InlineDocument;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Everything the model needs for one redesign exchange.
#[derive(Debug, Clone)]
pub struct DesignRequest {
    /// System instruction (the fixed design rules, or a caller override).
    pub system_instruction: String,
    /// The user turn accompanying the document payload.
    pub user_prompt: String,
    /// The source document, base64-encoded with its media type.
    pub document: InlineDocument,
    /// Response-schema declaration for structured output.
    pub response_schema: Value,
    /// Sampling temperature.
    pub temperature: f32,
    /// Generation ceiling.
    pub max_output_tokens: u32,
}

/// The raw outcome of one exchange: response text plus usage counts.
#[derive(Debug, Clone)]
pub struct DesignResponse {
    /// The structured-output text body (JSON, to be parsed downstream).
    pub text: String,
    /// Prompt tokens consumed, when the endpoint reports them.
    pub input_tokens: u64,
    /// Generated tokens, when the endpoint reports them.
    pub output_tokens: u64,
}

/// A generative document-transformation endpoint.
///
/// Implementations must be `Send + Sync`; the trait object is shared via
/// `Arc` between the config and the pipeline.
#[async_trait]
pub trait DesignModel: Send + Sync {
    /// Issue one redesign exchange. Exactly one network round trip; the
    /// implementation must not retry.
    async fn generate(&self, request: &DesignRequest) -> Result<DesignResponse, RedesignError>;

    /// Model id used for stats and logging.
    fn model_id(&self) -> &str;
}

// ── Gemini implementation ────────────────────────────────────────────────

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Production [`DesignModel`] speaking the Gemini `generateContent` REST
/// protocol.
///
/// The credential is taken at construction — never from ambient state — so
/// a missing key is a configuration failure raised before this type exists.
pub struct GeminiStudio {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiStudio {
    /// Create a client for the given key and model.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, RedesignError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RedesignError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the endpoint base URL (local proxies, integration tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl DesignModel for GeminiStudio {
    async fn generate(&self, request: &DesignRequest) -> Result<DesignResponse, RedesignError> {
        let body = GenerateContentRequest::from_design_request(request);

        debug!(
            "Requesting redesign from {} ({} bytes payload)",
            self.model,
            request.document.data.len()
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RedesignError::ServiceUnreachable {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(RedesignError::ServiceStatus {
                status: status.as_u16(),
                message: truncate(&message, 400),
            });
        }

        let parsed: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|e| RedesignError::ServiceUnreachable {
                    reason: format!("response body: {e}"),
                })?;

        let text = parsed.first_text().ok_or(RedesignError::EmptyResponse)?;

        let usage = parsed.usage_metadata.unwrap_or_default();
        debug!(
            "Model returned {} chars ({} tokens in / {} out)",
            text.len(),
            usage.prompt_token_count,
            usage.candidates_token_count
        );

        Ok(DesignResponse {
            text,
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
        })
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let cut = s
            .char_indices()
            .take_while(|(i, _)| *i < max)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}…", &s[..cut])
    }
}

// ── Wire types ───────────────────────────────────────────────────────────
//
// Only the fields this exchange uses; the endpoint tolerates (and this
// client ignores) everything else.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: WireContent,
    contents: Vec<WireContent>,
    generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    fn from_design_request(request: &DesignRequest) -> Self {
        Self {
            system_instruction: WireContent {
                parts: vec![WirePart::Text {
                    text: request.system_instruction.clone(),
                }],
            },
            contents: vec![WireContent {
                parts: vec![
                    WirePart::InlineData {
                        inline_data: request.document.clone(),
                    },
                    WirePart::Text {
                        text: request.user_prompt.clone(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: request.response_schema.clone(),
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct WireContent {
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WirePart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDocument,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// The first non-empty text part, if any.
    fn first_text(&self) -> Option<String> {
        self.candidates
            .iter()
            .flat_map(|c| c.content.parts.iter())
            .filter_map(|p| p.text.as_ref())
            .find(|t| !t.trim().is_empty())
            .cloned()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}
