//! Profile and verification data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated session's user.
///
/// A profile exists if and only if the session is logged in. It is
/// persisted in its entirety on every mutation — never field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub display_name: String,
    pub initials: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Create a profile at signup submission. Display name, initials, and
    /// username are derived once here; the password is validated by the
    /// form but never stored.
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Self {
        let first_name = first_name.trim().to_string();
        let last_name = last_name.trim().to_string();
        let display_name = format!("{first_name} {last_name}");
        let initials = derive_initials(&first_name, &last_name);
        let username = derive_username(&first_name, &last_name);
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email: email.trim().to_lowercase(),
            display_name,
            initials,
            username,
            role: None,
            experience: None,
            goal: None,
            bio: None,
            avatar: None,
            age: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_age(mut self, age: Option<u8>) -> Self {
        self.age = age;
        self
    }

    /// Merge onboarding quiz answers into the profile.
    pub fn apply_quiz(&mut self, quiz: &QuizAnswers) {
        self.role = Some(quiz.role.clone());
        self.experience = Some(quiz.experience.clone());
        self.goal = Some(quiz.goal.clone());
        self.bio = Some(quiz.bio.clone());
    }
}

fn derive_initials(first: &str, last: &str) -> String {
    let mut s = String::new();
    if let Some(c) = first.chars().next() {
        s.extend(c.to_uppercase());
    }
    if let Some(c) = last.chars().next() {
        s.extend(c.to_uppercase());
    }
    s
}

fn derive_username(first: &str, last: &str) -> String {
    let mut s = first.to_lowercase();
    if let Some(c) = last.chars().next() {
        s.extend(c.to_lowercase());
    }
    s
}

/// Answers collected by the onboarding quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswers {
    pub role: String,
    pub experience: String,
    pub goal: String,
    pub bio: String,
}

/// An outstanding email-confirmation challenge.
///
/// At most one exists at a time, scoped to the profile being confirmed.
/// Replaced wholesale on resend; deleted on successful match. Past
/// `expires_at` it is invalid — checked on use, never actively swept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl VerificationRecord {
    pub fn new(email: &str, code: &str, ttl: std::time::Duration) -> Self {
        Self {
            email: email.to_string(),
            code: code.to_string(),
            expires_at: Utc::now() + chrono::Duration::from_std(ttl).unwrap_or_default(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Trimmed exact string comparison; codes are opaque, so "0042" and
    /// "42" are different codes.
    pub fn matches(&self, input: &str) -> bool {
        input.trim() == self.code.trim()
    }
}
