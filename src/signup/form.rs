//! Multi-step signup form state.
//!
//! Fields are updated through the [`FieldUpdate`] enum — one variant per
//! field — so a typo in a field name is a compile error rather than a
//! silently ignored write.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::session::QuizAnswers;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("static email pattern"));

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_AGE: u8 = 17;
pub const MAX_AGE: u8 = 120;
pub const MIN_BIO_LEN: usize = 10;

/// The form's steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    BasicInfo,
    Role,
    Experience,
    Bio,
}

impl FormStep {
    pub const ALL: [FormStep; 4] = [
        FormStep::BasicInfo,
        FormStep::Role,
        FormStep::Experience,
        FormStep::Bio,
    ];

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

/// Step 1: identity and credentials. The password is validated here but
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub age: Option<u8>,
}

/// A single typed field write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    FirstName(String),
    LastName(String),
    Email(String),
    Password(String),
    Age(Option<u8>),
    Role(String),
    Experience(String),
    Goal(String),
    Bio(String),
}

/// Full multi-step form state.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub basic: BasicInfo,
    pub quiz: QuizAnswers,
    step: usize,
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> FormStep {
        FormStep::ALL[self.step]
    }

    pub fn total_steps(&self) -> usize {
        FormStep::ALL.len()
    }

    /// Apply a single field update.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::FirstName(v) => self.basic.first_name = v,
            FieldUpdate::LastName(v) => self.basic.last_name = v,
            FieldUpdate::Email(v) => self.basic.email = v,
            FieldUpdate::Password(v) => self.basic.password = v,
            FieldUpdate::Age(v) => self.basic.age = v,
            FieldUpdate::Role(v) => self.quiz.role = v,
            FieldUpdate::Experience(v) => self.quiz.experience = v,
            FieldUpdate::Goal(v) => self.quiz.goal = v,
            FieldUpdate::Bio(v) => self.quiz.bio = v,
        }
    }

    /// Advance one step, clamped at the last.
    pub fn next_step(&mut self) {
        if self.step + 1 < FormStep::ALL.len() {
            self.step += 1;
        }
    }

    /// Go back one step, clamped at the first.
    pub fn prev_step(&mut self) {
        self.step = self.step.saturating_sub(1);
    }

    /// Jump directly to a step.
    pub fn go_to_step(&mut self, step: FormStep) {
        self.step = step.index();
    }

    /// Reset to a blank form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate a single step. Empty vec means the step passes.
    pub fn validate_step(&self, step: FormStep) -> Vec<FieldError> {
        let mut errors = Vec::new();
        match step {
            FormStep::BasicInfo => {
                if self.basic.first_name.trim().is_empty() {
                    errors.push(FieldError::new("first_name", "First name is required"));
                }
                if self.basic.last_name.trim().is_empty() {
                    errors.push(FieldError::new("last_name", "Last name is required"));
                }
                if self.basic.email.trim().is_empty() {
                    errors.push(FieldError::new("email", "Email is required"));
                } else if !EMAIL_RE.is_match(self.basic.email.trim()) {
                    errors.push(FieldError::new("email", "Please enter a valid email"));
                }
                if self.basic.password.trim().is_empty() {
                    errors.push(FieldError::new("password", "Password is required"));
                } else if self.basic.password.len() < MIN_PASSWORD_LEN {
                    errors.push(FieldError::new(
                        "password",
                        format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
                    ));
                }
                if let Some(age) = self.basic.age {
                    if !(MIN_AGE..=MAX_AGE).contains(&age) {
                        errors.push(FieldError::new(
                            "age",
                            format!("Please enter a valid age ({MIN_AGE}-{MAX_AGE})"),
                        ));
                    }
                }
            }
            FormStep::Role => {
                errors.extend(
                    validate_quiz(&self.quiz)
                        .into_iter()
                        .filter(|e| e.field == "role"),
                );
            }
            FormStep::Experience => {
                errors.extend(
                    validate_quiz(&self.quiz)
                        .into_iter()
                        .filter(|e| e.field == "experience" || e.field == "goal"),
                );
            }
            FormStep::Bio => {
                errors.extend(
                    validate_quiz(&self.quiz)
                        .into_iter()
                        .filter(|e| e.field == "bio"),
                );
            }
        }
        errors
    }

    /// Validate every step.
    pub fn validate_all(&self) -> Vec<FieldError> {
        let mut errors = self.validate_step(FormStep::BasicInfo);
        errors.extend(validate_quiz(&self.quiz));
        errors
    }
}

/// Validate the onboarding quiz answers. Used both by the form's quiz
/// steps and by `SignupManager::complete_onboarding`.
pub fn validate_quiz(quiz: &QuizAnswers) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if quiz.role.trim().is_empty() {
        errors.push(FieldError::new("role", "Please select a role"));
    }
    if quiz.experience.trim().is_empty() {
        errors.push(FieldError::new(
            "experience",
            "Please select your experience level",
        ));
    }
    if quiz.goal.trim().is_empty() {
        errors.push(FieldError::new("goal", "Please select your main goal"));
    }
    if quiz.bio.trim().is_empty() {
        errors.push(FieldError::new("bio", "Please write a short bio"));
    } else if quiz.bio.trim().len() < MIN_BIO_LEN {
        errors.push(FieldError::new(
            "bio",
            format!("Bio should be at least {MIN_BIO_LEN} characters"),
        ));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_basic() -> SignupForm {
        let mut form = SignupForm::new();
        form.apply(FieldUpdate::FirstName("Sarah".into()));
        form.apply(FieldUpdate::LastName("Johnson".into()));
        form.apply(FieldUpdate::Email("sarah@example.com".into()));
        form.apply(FieldUpdate::Password("hunter22".into()));
        form
    }

    #[test]
    fn blank_basic_info_reports_every_required_field() {
        let form = SignupForm::new();
        let errors = form.validate_step(FormStep::BasicInfo);
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["first_name", "last_name", "email", "password"]);
    }

    #[test]
    fn valid_basic_info_passes() {
        assert!(valid_basic().validate_step(FormStep::BasicInfo).is_empty());
    }

    #[test]
    fn email_format_is_checked() {
        let mut form = valid_basic();
        form.apply(FieldUpdate::Email("not-an-email".into()));
        let errors = form.validate_step(FormStep::BasicInfo);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn short_password_rejected() {
        let mut form = valid_basic();
        form.apply(FieldUpdate::Password("12345".into()));
        let errors = form.validate_step(FormStep::BasicInfo);
        assert_eq!(errors[0].field, "password");
    }

    #[test]
    fn age_is_optional_but_bounded() {
        let mut form = valid_basic();
        assert!(form.validate_step(FormStep::BasicInfo).is_empty());

        form.apply(FieldUpdate::Age(Some(16)));
        assert_eq!(form.validate_step(FormStep::BasicInfo)[0].field, "age");

        form.apply(FieldUpdate::Age(Some(17)));
        assert!(form.validate_step(FormStep::BasicInfo).is_empty());
    }

    #[test]
    fn quiz_steps_require_answers() {
        let mut form = valid_basic();
        assert!(!form.validate_step(FormStep::Role).is_empty());
        assert_eq!(form.validate_step(FormStep::Experience).len(), 2);

        form.apply(FieldUpdate::Role("Content Marketer".into()));
        form.apply(FieldUpdate::Experience("Débutant (0-1 an)".into()));
        form.apply(FieldUpdate::Goal("Réseauter avec des pairs".into()));
        form.apply(FieldUpdate::Bio("short".into()));
        assert_eq!(form.validate_step(FormStep::Bio)[0].field, "bio");

        form.apply(FieldUpdate::Bio("A bio long enough to pass.".into()));
        assert!(form.validate_all().is_empty());
    }

    #[test]
    fn navigation_clamps_at_bounds() {
        let mut form = SignupForm::new();
        assert_eq!(form.current_step(), FormStep::BasicInfo);
        form.prev_step();
        assert_eq!(form.current_step(), FormStep::BasicInfo);

        for _ in 0..10 {
            form.next_step();
        }
        assert_eq!(form.current_step(), FormStep::Bio);

        form.go_to_step(FormStep::Experience);
        assert_eq!(form.current_step(), FormStep::Experience);
    }

    #[test]
    fn reset_clears_fields_and_step() {
        let mut form = valid_basic();
        form.next_step();
        form.reset();
        assert_eq!(form.current_step(), FormStep::BasicInfo);
        assert!(form.basic.first_name.is_empty());
    }
}
