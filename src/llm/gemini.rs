//! HTTP client for the hosted generative API.
//!
//! Wire contract: `POST {base}/v1beta/models/{model}:generateContent` with
//! ordered `contents` (role + text parts), an optional `systemInstruction`,
//! and a thinking-budget hint under `generationConfig.thinkingConfig`. The
//! reply text is the concatenation of the first candidate's parts.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{GenerateRequest, GenerativeBackend};
use crate::error::BackendError;

/// Production backend client.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait::async_trait]
impl GenerativeBackend for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String, BackendError> {
        let body = WireRequest::from(request);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Backend returned an error");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: WireResponse = response.json().await.map_err(|e| {
            BackendError::InvalidResponse {
                reason: e.to_string(),
            }
        })?;
        reply.text().ok_or(BackendError::InvalidResponse {
            reason: "no candidates in response".to_string(),
        })
    }
}

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest {
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireContent {
    role: String,
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WirePart {
    text: String,
}

#[derive(Debug, Serialize)]
struct WireInstruction {
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    thinking_config: WireThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireThinkingConfig {
    thinking_budget: i32,
}

impl From<GenerateRequest> for WireRequest {
    fn from(request: GenerateRequest) -> Self {
        Self {
            contents: request
                .turns
                .into_iter()
                .map(|turn| WireContent {
                    role: turn.role.as_str().to_string(),
                    parts: vec![WirePart { text: turn.text }],
                })
                .collect(),
            system_instruction: request.system_instruction.map(|text| WireInstruction {
                parts: vec![WirePart { text }],
            }),
            generation_config: request.thinking_budget.map(|thinking_budget| {
                WireGenerationConfig {
                    thinking_config: WireThinkingConfig { thinking_budget },
                }
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize)]
struct WireCandidate {
    content: Option<WireCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct WireCandidateContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

impl WireResponse {
    /// Concatenated text of the first candidate's parts.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        Some(
            content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join(""),
        )
    }
}
