//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

/// Configuration for the text-correction pipeline.
#[derive(Debug, Clone)]
pub struct CorrectionConfig {
    /// Gemini API key, if configured.
    pub gemini_key: Option<SecretString>,
    /// OpenAI API key, if configured.
    pub openai_key: Option<SecretString>,
    /// Gemini model name.
    pub gemini_model: String,
    /// OpenAI model name.
    pub openai_model: String,
    /// Per-request timeout for remote provider calls. Bounds the worst-case
    /// latency before the local fallback is reached.
    pub request_timeout: Duration,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            gemini_key: None,
            openai_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl CorrectionConfig {
    /// Build from environment variables (`GEMINI_API_KEY`, `OPENAI_API_KEY`,
    /// optional model overrides). Missing keys leave the provider
    /// unavailable; they are never an error.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            gemini_key: std::env::var("GEMINI_API_KEY").ok().map(SecretString::from),
            openai_key: std::env::var("OPENAI_API_KEY").ok().map(SecretString::from),
            gemini_model: std::env::var("WEBMARK_GEMINI_MODEL")
                .unwrap_or(defaults.gemini_model),
            openai_model: std::env::var("WEBMARK_OPENAI_MODEL")
                .unwrap_or(defaults.openai_model),
            request_timeout: std::env::var("WEBMARK_PROVIDER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}

/// Configuration for the signup/verification state machine.
#[derive(Debug, Clone)]
pub struct SignupConfig {
    /// Failed attempts before a lockout window is established.
    pub max_attempts: u8,
    /// Lockout duration after too many failed attempts.
    pub lockout: Duration,
    /// Verification-code lifetime.
    pub code_ttl: Duration,
    /// Verification-issuance webhook endpoint.
    pub issuance_url: String,
}

impl Default for SignupConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout: Duration::from_secs(2 * 60),
            code_ttl: Duration::from_secs(15 * 60),
            issuance_url: "https://n8n.deontex.com/webhook/signup-webhook".to_string(),
        }
    }
}

impl SignupConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            issuance_url: std::env::var("WEBMARK_ISSUANCE_URL")
                .unwrap_or(defaults.issuance_url.clone()),
            ..defaults
        }
    }
}
