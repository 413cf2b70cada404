//! Session state — persisted profile/onboarding/verification data behind
//! one explicit seam.
//!
//! Every mutation writes the backing store and the in-memory snapshot
//! before returning, so a reload never observes a profile without its
//! onboarded flag (or vice versa). The redirect guard and state machine
//! consult this facade instead of reading storage ad hoc.

pub mod libsql_backend;
pub mod memory;
pub mod model;
pub mod store;

pub use libsql_backend::LibSqlStore;
pub use memory::MemoryStore;
pub use model::{Profile, QuizAnswers, VerificationRecord};
pub use store::{SessionStore, keys};

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::StoreError;

/// Point-in-time view of the session, as the redirect guard sees it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub profile: Option<Profile>,
    pub onboarded: bool,
}

impl SessionSnapshot {
    pub fn is_logged_in(&self) -> bool {
        self.profile.is_some()
    }
}

/// Typed facade over a [`SessionStore`] with change notification.
pub struct Session {
    store: Arc<dyn SessionStore>,
    tx: watch::Sender<SessionSnapshot>,
}

impl Session {
    /// Wrap a store with an empty snapshot. Call [`Session::hydrate`] to
    /// load persisted state.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (tx, _) = watch::channel(SessionSnapshot::default());
        Self { store, tx }
    }

    /// Load the persisted profile and onboarded flag into the snapshot.
    pub async fn hydrate(&self) -> Result<(), StoreError> {
        let profile = match self.store.get(keys::PROFILE).await? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| StoreError::Serialization(e.to_string()))
                .map(Some)?,
            None => None,
        };
        let onboarded = matches!(
            self.store.get(keys::ONBOARDED).await?,
            Some(serde_json::Value::String(s)) if s == "true"
        );
        self.tx.send_replace(SessionSnapshot { profile, onboarded });
        Ok(())
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.tx.borrow().profile.clone()
    }

    pub fn is_onboarded(&self) -> bool {
        self.tx.borrow().onboarded
    }

    /// Persist a profile wholesale and update the snapshot.
    pub async fn set_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let value = serde_json::to_value(profile)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(keys::PROFILE, &value).await?;
        self.tx.send_modify(|s| s.profile = Some(profile.clone()));
        Ok(())
    }

    pub async fn clear_profile(&self) -> Result<(), StoreError> {
        self.store.remove(keys::PROFILE).await?;
        self.tx.send_modify(|s| s.profile = None);
        Ok(())
    }

    /// Set or clear the onboarded flag. Stored as the string `"true"` or
    /// removed entirely, matching the key layout the pages read.
    pub async fn set_onboarded(&self, onboarded: bool) -> Result<(), StoreError> {
        if onboarded {
            self.store
                .set(keys::ONBOARDED, &serde_json::Value::String("true".into()))
                .await?;
        } else {
            self.store.remove(keys::ONBOARDED).await?;
        }
        self.tx.send_modify(|s| s.onboarded = onboarded);
        Ok(())
    }

    pub async fn verification(&self) -> Result<Option<VerificationRecord>, StoreError> {
        match self.store.get(keys::SIGNUP_VERIFICATION).await? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| StoreError::Serialization(e.to_string()))
                .map(Some),
            None => Ok(None),
        }
    }

    /// Replace the verification record wholesale.
    pub async fn set_verification(&self, record: &VerificationRecord) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(keys::SIGNUP_VERIFICATION, &value).await
    }

    pub async fn clear_verification(&self) -> Result<(), StoreError> {
        self.store.remove(keys::SIGNUP_VERIFICATION).await?;
        Ok(())
    }

    /// Raw store access for satellite data (posts).
    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }
}
