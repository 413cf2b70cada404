//! Signup, email verification, and onboarding.

pub mod form;
pub mod issuer;
pub mod manager;
pub mod state;

pub use form::{FieldUpdate, FormStep, SignupForm, validate_quiz};
pub use issuer::{CodeIssuer, HttpCodeIssuer};
pub use manager::{CodeDelivery, SignupManager};
pub use state::SignupPhase;
