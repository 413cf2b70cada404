//! `SessionStore` trait — single async interface for persisted session state.
//!
//! String-keyed JSON values, matching the key layout the UI pages read:
//! `profile`, `onboarded`, `signup_verification`, `posts_<username>`.

use async_trait::async_trait;

use crate::error::StoreError;

/// Well-known storage keys.
pub mod keys {
    pub const PROFILE: &str = "profile";
    pub const ONBOARDED: &str = "onboarded";
    pub const SIGNUP_VERIFICATION: &str = "signup_verification";

    /// Per-user post list key.
    pub fn posts(username: &str) -> String {
        format!("posts_{username}")
    }
}

/// Backend-agnostic key-value store for session state.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get a value by key. Missing keys are `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Set a value, replacing any existing one.
    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError>;

    /// Remove a key. Returns whether it existed.
    async fn remove(&self, key: &str) -> Result<bool, StoreError>;
}
