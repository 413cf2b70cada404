//! Remote correction providers.
//!
//! Each provider is a thin JSON client behind the [`CorrectionProvider`]
//! trait. Response bodies are extracted defensively — first
//! candidate/choice, trimmed, degrading to the original input when the
//! structure is missing — and every transport failure maps to a
//! [`ProviderError`] for the pipeline to absorb.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use crate::config::CorrectionConfig;
use crate::error::ProviderError;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// System instruction shared by all providers: corrected text only,
/// no commentary.
pub(crate) const CORRECTION_INSTRUCTION: &str = "You are a professional language correction \
assistant. Your task is to automatically correct the user's text. Correct: spelling mistakes \
(example: 'helo' -> 'hello'), grammar errors, conjugation mistakes, capitalization errors, \
punctuation issues, and informal contractions (example: 'im' -> 'I am', 'dont' -> 'don't', \
'cant' -> 'can't'). Keep the original meaning. If the text is already correct, return it \
unchanged. Return ONLY the corrected text. Do not explain anything. Do not add comments. \
Do not add extra sentences.";

/// Supported remote providers, in fallback priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    /// Fixed priority order when no explicit provider is requested.
    pub const PRIORITY: [ProviderKind; 2] = [ProviderKind::Gemini, ProviderKind::OpenAi];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A remote text-correction capability.
#[async_trait]
pub trait CorrectionProvider: Send + Sync {
    /// Which provider this is (used for the result's source tag).
    fn kind(&self) -> ProviderKind;

    /// Whether the provider's access credential is configured.
    fn is_available(&self) -> bool;

    /// Attempt one correction call. Any `Err` makes the pipeline advance
    /// to the next candidate.
    async fn attempt(&self, text: &str) -> Result<String, ProviderError>;
}

fn build_client(config: &CorrectionConfig) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| ProviderError::RequestFailed {
            provider: "http".to_string(),
            reason: format!("Failed to build HTTP client: {e}"),
        })
}

// ── Gemini ──────────────────────────────────────────────────────────

/// Google Gemini `generateContent` client.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    model: String,
}

impl GeminiProvider {
    pub fn new(config: &CorrectionConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(config)?,
            api_key: config.gemini_key.clone(),
            model: config.gemini_model.clone(),
        })
    }
}

#[async_trait]
impl CorrectionProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn attempt(&self, text: &str) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ProviderError::MissingCredential {
                provider: self.kind().name().to_string(),
            })?;

        let body = json!({
            "contents": [{
                "parts": [{
                    "text": format!("{CORRECTION_INSTRUCTION}\n\nText to correct:\n\"{text}\"")
                }]
            }],
            "generationConfig": {
                // Lower temperature for more consistent correction
                "temperature": 0.2,
                "maxOutputTokens": 1000,
            }
        });

        let url = format!("{GEMINI_ENDPOINT}/{}:generateContent", self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed {
                provider: self.kind().name().to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::HttpStatus {
                provider: self.kind().name().to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let data: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidResponse {
                    provider: self.kind().name().to_string(),
                    reason: e.to_string(),
                })?;
        Ok(extract_gemini_text(&data, text))
    }
}

/// First candidate's first part, trimmed; the original input when the
/// structure is missing.
pub(crate) fn extract_gemini_text(data: &serde_json::Value, fallback: &str) -> String {
    data.pointer("/candidates/0/content/parts/0/text")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

// ── OpenAI ──────────────────────────────────────────────────────────

/// OpenAI chat-completions client.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    model: String,
}

impl OpenAiProvider {
    pub fn new(config: &CorrectionConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(config)?,
            api_key: config.openai_key.clone(),
            model: config.openai_model.clone(),
        })
    }
}

#[async_trait]
impl CorrectionProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn attempt(&self, text: &str) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ProviderError::MissingCredential {
                provider: self.kind().name().to_string(),
            })?;

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": CORRECTION_INSTRUCTION },
                { "role": "user", "content": text },
            ],
            "temperature": 0.7,
            "max_tokens": 500,
        });

        let response = self
            .client
            .post(OPENAI_ENDPOINT)
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed {
                provider: self.kind().name().to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::HttpStatus {
                provider: self.kind().name().to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let data: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidResponse {
                    provider: self.kind().name().to_string(),
                    reason: e.to_string(),
                })?;
        Ok(extract_openai_text(&data, text))
    }
}

/// First choice's message content, trimmed; the original input when the
/// structure is missing.
pub(crate) fn extract_openai_text(data: &serde_json::Value, fallback: &str) -> String {
    data.pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
