//! SignupManager — drives the signup/verification/onboarding flow.
//!
//! Persisted state (profile, onboarded flag, verification record) goes
//! through the [`Session`] facade; the attempt counter and lockout window
//! are session-local and never persisted, so a reload clears them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::SignupConfig;
use crate::error::{Error, IssuanceError, Result, SignupError, VerificationError};
use crate::session::{Profile, QuizAnswers, Session, VerificationRecord};
use crate::signup::form::{SignupForm, FormStep, validate_quiz};
use crate::signup::issuer::CodeIssuer;
use crate::signup::state::SignupPhase;

/// Whether a submit actually produced a verification record.
///
/// Issuance failure still advances to `AwaitingCode`; the user must
/// resend before a code can succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeDelivery {
    Sent,
    NotSent,
}

/// Failed attempts since the last resend, plus the lockout window.
#[derive(Debug, Clone, Copy, Default)]
struct AttemptState {
    failed: u8,
    locked_until: Option<DateTime<Utc>>,
}

pub struct SignupManager {
    session: Arc<Session>,
    issuer: Arc<dyn CodeIssuer>,
    config: SignupConfig,
    phase: RwLock<SignupPhase>,
    attempts: RwLock<AttemptState>,
}

impl SignupManager {
    pub fn new(session: Arc<Session>, issuer: Arc<dyn CodeIssuer>, config: SignupConfig) -> Self {
        Self {
            session,
            issuer,
            config,
            phase: RwLock::new(SignupPhase::CollectingProfile),
            attempts: RwLock::new(AttemptState::default()),
        }
    }

    /// Current phase. A lapsed lockout window auto-exits back to
    /// `AwaitingCode` — no explicit event needed.
    pub async fn phase(&self) -> SignupPhase {
        let phase = *self.phase.read().await;
        if phase == SignupPhase::Locked {
            let attempts = *self.attempts.read().await;
            if attempts.locked_until.is_none_or(|until| Utc::now() >= until) {
                let mut guard = self.phase.write().await;
                *guard = SignupPhase::AwaitingCode;
                return SignupPhase::AwaitingCode;
            }
        }
        phase
    }

    /// Remaining lockout duration, if currently locked.
    pub async fn lockout_remaining(&self) -> Option<std::time::Duration> {
        let attempts = self.attempts.read().await;
        let until = attempts.locked_until?;
        (Utc::now() < until).then(|| (until - Utc::now()).to_std().unwrap_or_default())
    }

    /// Submit the profile form: validate, persist the profile (not yet
    /// onboarded), request a verification code, advance to `AwaitingCode`.
    pub async fn submit_profile(&self, form: &SignupForm) -> Result<CodeDelivery> {
        self.require_phase(SignupPhase::CollectingProfile, "submit_profile")
            .await?;

        let errors = form.validate_step(FormStep::BasicInfo);
        if !errors.is_empty() {
            return Err(SignupError::Validation(errors).into());
        }

        let profile = Profile::new(
            &form.basic.first_name,
            &form.basic.last_name,
            &form.basic.email,
        )
        .with_age(form.basic.age);

        // Persist before the issuance call so a reload mid-flight still
        // observes a consistent (profile, not-onboarded) pair.
        self.session.set_profile(&profile).await.map_err(Error::Store)?;
        self.session.set_onboarded(false).await.map_err(Error::Store)?;
        self.session
            .clear_verification()
            .await
            .map_err(Error::Store)?;

        let delivery = match self.issuer.issue(&profile.email).await {
            Ok(Some(code)) => {
                let record = VerificationRecord::new(&profile.email, &code, self.config.code_ttl);
                self.session
                    .set_verification(&record)
                    .await
                    .map_err(Error::Store)?;
                CodeDelivery::Sent
            }
            Ok(None) => {
                warn!(email = %profile.email, "Issuance returned no code; resend required");
                CodeDelivery::NotSent
            }
            Err(e) => {
                warn!(email = %profile.email, error = %e, "Issuance failed; resend required");
                CodeDelivery::NotSent
            }
        };

        *self.attempts.write().await = AttemptState::default();
        *self.phase.write().await = SignupPhase::AwaitingCode;
        info!(username = %profile.username, "Signup submitted, awaiting code");
        Ok(delivery)
    }

    /// Confirm a user-entered verification code.
    ///
    /// While locked, every submission is rejected regardless of
    /// correctness. A successful match consumes the record exactly once
    /// and advances to the onboarding quiz.
    pub async fn confirm_code(&self, input: &str) -> Result<()> {
        let phase = self.phase().await;
        if !matches!(phase, SignupPhase::AwaitingCode | SignupPhase::Locked) {
            return Err(SignupError::InvalidPhase {
                phase: phase.to_string(),
                operation: "confirm_code".to_string(),
            }
            .into());
        }

        if let Some(retry_after) = self.lockout_remaining().await {
            return Err(VerificationError::Locked { retry_after }.into());
        }

        let record = self
            .session
            .verification()
            .await
            .map_err(Error::Store)?
            .ok_or(VerificationError::NoCode)?;

        if record.is_expired() {
            return Err(VerificationError::Expired.into());
        }

        if record.matches(input) {
            self.session
                .clear_verification()
                .await
                .map_err(Error::Store)?;
            *self.attempts.write().await = AttemptState::default();
            *self.phase.write().await = SignupPhase::Onboarding;
            info!("Verification code accepted");
            return Ok(());
        }

        let mut attempts = self.attempts.write().await;
        attempts.failed += 1;
        if attempts.failed >= self.config.max_attempts {
            let until = Utc::now()
                + chrono::Duration::from_std(self.config.lockout).unwrap_or_default();
            attempts.locked_until = Some(until);
            *self.phase.write().await = SignupPhase::Locked;
            warn!(failed = attempts.failed, "Verification locked out");
            return Err(VerificationError::Locked {
                retry_after: self.config.lockout,
            }
            .into());
        }
        Err(VerificationError::Mismatch {
            attempts_remaining: self.config.max_attempts - attempts.failed,
        }
        .into())
    }

    /// Re-issue the verification code: replaces the record wholesale,
    /// resets the attempt counter, clears any lockout.
    pub async fn resend(&self) -> Result<()> {
        let email = self
            .session
            .profile()
            .map(|p| p.email)
            .ok_or(IssuanceError::MissingEmail)?;

        let code = self
            .issuer
            .issue(&email)
            .await?
            .ok_or(IssuanceError::NoCode)?;

        let record = VerificationRecord::new(&email, &code, self.config.code_ttl);
        self.session
            .set_verification(&record)
            .await
            .map_err(Error::Store)?;
        *self.attempts.write().await = AttemptState::default();
        *self.phase.write().await = SignupPhase::AwaitingCode;
        info!(email = %email, "Verification code resent");
        Ok(())
    }

    /// Complete the onboarding quiz: merge answers into the profile, set
    /// the onboarded flag, unlock full access.
    pub async fn complete_onboarding(&self, quiz: &QuizAnswers) -> Result<()> {
        self.require_phase(SignupPhase::Onboarding, "complete_onboarding")
            .await?;

        let errors = validate_quiz(quiz);
        if !errors.is_empty() {
            return Err(SignupError::Validation(errors).into());
        }

        let mut profile = self
            .session
            .profile()
            .ok_or(SignupError::NoProfile)?;
        profile.apply_quiz(quiz);

        self.session.set_profile(&profile).await.map_err(Error::Store)?;
        self.session.set_onboarded(true).await.map_err(Error::Store)?;
        *self.phase.write().await = SignupPhase::Active;
        info!(username = %profile.username, "Onboarding complete");
        Ok(())
    }

    /// Log in with an existing profile: wholesale replacement, onboarded
    /// flag set (legacy path — no quiz replay on login).
    pub async fn login(&self, profile: Profile) -> Result<()> {
        self.session.set_profile(&profile).await.map_err(Error::Store)?;
        self.session.set_onboarded(true).await.map_err(Error::Store)?;
        *self.attempts.write().await = AttemptState::default();
        *self.phase.write().await = SignupPhase::Active;
        info!(username = %profile.username, "Logged in");
        Ok(())
    }

    /// Log out: clears the profile, onboarded flag, and any verification
    /// record; returns to `CollectingProfile`.
    pub async fn logout(&self) -> Result<()> {
        self.session.clear_profile().await.map_err(Error::Store)?;
        self.session.set_onboarded(false).await.map_err(Error::Store)?;
        self.session
            .clear_verification()
            .await
            .map_err(Error::Store)?;
        *self.attempts.write().await = AttemptState::default();
        *self.phase.write().await = SignupPhase::CollectingProfile;
        info!("Logged out");
        Ok(())
    }

    async fn require_phase(&self, expected: SignupPhase, operation: &str) -> Result<()> {
        let phase = self.phase().await;
        if phase != expected {
            return Err(SignupError::InvalidPhase {
                phase: phase.to_string(),
                operation: operation.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
