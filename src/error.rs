//! Error types for the WebMark core.

use std::time::Duration;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Issuance error: {0}")]
    Issuance(#[from] IssuanceError),

    #[error("Verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("Signup error: {0}")]
    Signup(#[from] SignupError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Session-store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Remote correction-provider errors. Absorbed inside the pipeline;
/// never reach `correct()` callers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider {provider} has no credential configured")]
    MissingCredential { provider: String },

    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} returned HTTP {status}: {body}")]
    HttpStatus {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Errors from the verification-code issuance endpoint.
#[derive(Debug, thiserror::Error)]
pub enum IssuanceError {
    #[error("No profile email available for code issuance")]
    MissingEmail,

    #[error("Issuance request failed: {0}")]
    RequestFailed(String),

    #[error("Issuance endpoint returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("Issuance endpoint returned no usable code")]
    NoCode,
}

/// Errors surfaced by code confirmation. Each maps to a distinct inline
/// message in the UI.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("No verification code available; resend required")]
    NoCode,

    #[error("Verification code has expired; resend required")]
    Expired,

    #[error("Incorrect code ({attempts_remaining} attempts remaining)")]
    Mismatch { attempts_remaining: u8 },

    #[error("Too many attempts; retry in {retry_after:?}")]
    Locked { retry_after: Duration },
}

/// Signup state-machine errors.
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Operation not allowed in phase {phase}: {operation}")]
    InvalidPhase { phase: String, operation: String },

    #[error("No profile in session")]
    NoProfile,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// A single field-level validation failure, surfaced inline next to the
/// offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
