//! Verification-code issuance.
//!
//! The remote endpoint emails a code to the given address and echoes it in
//! the JSON response. A response without a `code` field means "no usable
//! code returned" — that is `Ok(None)`, not an error.

use async_trait::async_trait;

use crate::config::SignupConfig;
use crate::error::IssuanceError;

/// Issues (or re-issues) a verification code for an email address.
#[async_trait]
pub trait CodeIssuer: Send + Sync {
    async fn issue(&self, email: &str) -> Result<Option<String>, IssuanceError>;
}

/// Webhook-backed issuer.
pub struct HttpCodeIssuer {
    client: reqwest::Client,
    url: String,
}

impl HttpCodeIssuer {
    pub fn new(config: &SignupConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.issuance_url.clone(),
        }
    }
}

#[async_trait]
impl CodeIssuer for HttpCodeIssuer {
    async fn issue(&self, email: &str) -> Result<Option<String>, IssuanceError> {
        let response = self
            .client
            .post(&self.url)
            .query(&[("email", email)])
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| IssuanceError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IssuanceError::HttpStatus {
                status: status.as_u16(),
            });
        }

        // The code may come back as a string or a number; either way it is
        // stored and compared as an opaque string.
        let body: serde_json::Value = match response.json().await {
            Ok(v) => v,
            Err(_) => return Ok(None),
        };
        Ok(code_from_body(&body))
    }
}

pub(crate) fn code_from_body(body: &serde_json::Value) -> Option<String> {
    match body.get("code") {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => {
            Some(s.trim().to_string())
        }
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
