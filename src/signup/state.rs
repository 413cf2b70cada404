//! Signup state machine — tracks which phase the session is in.

use serde::{Deserialize, Serialize};

/// The phases of the signup/verification flow.
///
/// Progresses linearly: CollectingProfile → AwaitingCode → Onboarding →
/// Active. `Locked` is a time-bounded detour out of `AwaitingCode` after
/// too many failed code submissions. Logout returns any phase to
/// `CollectingProfile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupPhase {
    CollectingProfile,
    AwaitingCode,
    Locked,
    Onboarding,
    Active,
}

impl SignupPhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: SignupPhase) -> bool {
        use SignupPhase::*;
        // Logout resets from anywhere
        if target == CollectingProfile {
            return *self != CollectingProfile;
        }
        matches!(
            (self, target),
            (CollectingProfile, AwaitingCode)
                | (AwaitingCode, Locked)
                | (Locked, AwaitingCode)
                | (AwaitingCode, Onboarding)
                | (Onboarding, Active)
        )
    }

    /// Whether full application access is unlocked.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl Default for SignupPhase {
    fn default() -> Self {
        Self::CollectingProfile
    }
}

impl std::fmt::Display for SignupPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CollectingProfile => "collecting_profile",
            Self::AwaitingCode => "awaiting_code",
            Self::Locked => "locked",
            Self::Onboarding => "onboarding",
            Self::Active => "active",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        use SignupPhase::*;
        let transitions = [
            (CollectingProfile, AwaitingCode),
            (AwaitingCode, Locked),
            (Locked, AwaitingCode),
            (AwaitingCode, Onboarding),
            (Onboarding, Active),
        ];
        for (from, to) in transitions {
            assert!(
                from.can_transition_to(to),
                "{from} should transition to {to}"
            );
        }
    }

    #[test]
    fn logout_resets_from_any_phase() {
        use SignupPhase::*;
        for phase in [AwaitingCode, Locked, Onboarding, Active] {
            assert!(phase.can_transition_to(CollectingProfile));
        }
        assert!(!CollectingProfile.can_transition_to(CollectingProfile));
    }

    #[test]
    fn invalid_transitions() {
        use SignupPhase::*;
        // Skip phases
        assert!(!CollectingProfile.can_transition_to(Onboarding));
        assert!(!CollectingProfile.can_transition_to(Active));
        assert!(!AwaitingCode.can_transition_to(Active));
        // Locked only returns to AwaitingCode
        assert!(!Locked.can_transition_to(Onboarding));
        assert!(!Locked.can_transition_to(Active));
        // No going backward mid-flow
        assert!(!Onboarding.can_transition_to(AwaitingCode));
        assert!(!Active.can_transition_to(Onboarding));
    }

    #[test]
    fn display_matches_serde() {
        use SignupPhase::*;
        for phase in [CollectingProfile, AwaitingCode, Locked, Onboarding, Active] {
            let display = format!("{phase}");
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(format!("\"{display}\""), json);
        }
    }
}
