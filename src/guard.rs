//! Redirect guard — reconciles the current route against session state.
//!
//! A pure rule plus a thin subscriber. The rule is evaluated after every
//! session mutation (not just on navigation) so login/logout/onboarding
//! completion immediately force the right route, and it is idempotent:
//! feeding a forced route back in yields no further redirect.

use tokio::sync::watch;

use crate::session::SessionSnapshot;

/// Application routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Signup,
    Login,
    ConfirmCode,
    Onboarding,
    Profile,
    UserProfile,
    Contact,
    NotFound,
}

impl Route {
    /// Routes a logged-out session is allowed to sit on.
    pub fn is_auth_entry(&self) -> bool {
        matches!(self, Self::Signup | Self::Login)
    }

    /// Routes belonging to the post-signup onboarding flow (code
    /// confirmation included — a not-yet-onboarded session must not be
    /// bounced off the verification screen).
    pub fn is_onboarding_flow(&self) -> bool {
        matches!(self, Self::Onboarding | Self::ConfirmCode)
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Signup => "/signup",
            Self::Login => "/login",
            Self::ConfirmCode => "/confirm-code",
            Self::Onboarding => "/onboarding",
            Self::Profile => "/profile",
            Self::UserProfile => "/user",
            Self::Contact => "/contact",
            Self::NotFound => "/404",
        }
    }
}

/// Compute the forced route, if any, for the given session state.
pub fn required_route(snapshot: &SessionSnapshot, current: Route) -> Option<Route> {
    match (snapshot.is_logged_in(), snapshot.onboarded) {
        (false, _) => (!current.is_auth_entry()).then_some(Route::Signup),
        (true, false) => (!current.is_onboarding_flow()).then_some(Route::Onboarding),
        (true, true) => (current.is_auth_entry() || current.is_onboarding_flow())
            .then_some(Route::Home),
    }
}

/// Watches session snapshots and yields the forced route after each
/// change.
pub struct RedirectGuard {
    rx: watch::Receiver<SessionSnapshot>,
}

impl RedirectGuard {
    pub fn new(rx: watch::Receiver<SessionSnapshot>) -> Self {
        Self { rx }
    }

    /// Reconcile against the latest snapshot, synchronously.
    pub fn reconcile(&self, current: Route) -> Option<Route> {
        required_route(&self.rx.borrow(), current)
    }

    /// Wait for the next session change, then reconcile.
    pub async fn next_redirect(&mut self, current: Route) -> Option<Route> {
        if self.rx.changed().await.is_err() {
            return None;
        }
        self.reconcile(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Profile;

    fn logged_out() -> SessionSnapshot {
        SessionSnapshot::default()
    }

    fn pending() -> SessionSnapshot {
        SessionSnapshot {
            profile: Some(Profile::new("Sarah", "Johnson", "s@x.com")),
            onboarded: false,
        }
    }

    fn active() -> SessionSnapshot {
        SessionSnapshot {
            onboarded: true,
            ..pending()
        }
    }

    #[test]
    fn logged_out_forced_to_signup() {
        for route in [Route::Home, Route::Profile, Route::Onboarding, Route::Contact] {
            assert_eq!(required_route(&logged_out(), route), Some(Route::Signup));
        }
        assert_eq!(required_route(&logged_out(), Route::Signup), None);
        assert_eq!(required_route(&logged_out(), Route::Login), None);
    }

    #[test]
    fn not_onboarded_forced_into_onboarding_flow() {
        for route in [Route::Home, Route::Signup, Route::Profile] {
            assert_eq!(required_route(&pending(), route), Some(Route::Onboarding));
        }
        assert_eq!(required_route(&pending(), Route::Onboarding), None);
        assert_eq!(required_route(&pending(), Route::ConfirmCode), None);
    }

    #[test]
    fn active_session_bounced_off_entry_routes() {
        for route in [Route::Signup, Route::Login, Route::Onboarding, Route::ConfirmCode] {
            assert_eq!(required_route(&active(), route), Some(Route::Home));
        }
        assert_eq!(required_route(&active(), Route::Home), None);
        assert_eq!(required_route(&active(), Route::Profile), None);
    }

    #[test]
    fn reconciliation_is_idempotent() {
        for snapshot in [logged_out(), pending(), active()] {
            for route in [
                Route::Home,
                Route::Signup,
                Route::Login,
                Route::ConfirmCode,
                Route::Onboarding,
                Route::Profile,
                Route::Contact,
            ] {
                if let Some(forced) = required_route(&snapshot, route) {
                    assert_eq!(
                        required_route(&snapshot, forced),
                        None,
                        "forcing {route:?} -> {forced:?} must settle"
                    );
                }
            }
        }
    }

    #[tokio::test]
    async fn guard_reacts_to_session_changes() {
        use std::sync::Arc;

        use crate::session::{MemoryStore, Session};

        let session = Session::new(Arc::new(MemoryStore::new()));
        let mut guard = RedirectGuard::new(session.subscribe());
        assert_eq!(guard.reconcile(Route::Home), Some(Route::Signup));

        let profile = Profile::new("Emma", "Garcia", "e@x.com");
        session.set_profile(&profile).await.unwrap();
        assert_eq!(
            guard.next_redirect(Route::Home).await,
            Some(Route::Onboarding)
        );

        session.set_onboarded(true).await.unwrap();
        assert_eq!(guard.next_redirect(Route::Onboarding).await, Some(Route::Home));
        assert_eq!(guard.reconcile(Route::Home), None);
    }
}
