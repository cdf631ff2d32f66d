//! Authentication session value objects returned by signup and login.

use serde::{Deserialize, Serialize};

use crate::domain::entities::mfa_challenge::MfaChallenge;
use crate::domain::entities::onboarding::OnboardingStep;

/// Successful authentication artifact: the access credential plus routing
/// hints for the embedding application.
///
/// Held in memory only; this layer never persists credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Bearer credential for subsequent account service calls
    pub access_token: String,

    /// Refresh-cadence hint in seconds
    pub expires_in: i64,

    /// Whether the account still has guided onboarding to finish
    #[serde(default)]
    pub requires_onboarding: bool,

    /// Where to resume onboarding, when `requires_onboarding` is true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_step: Option<OnboardingStep>,
}

/// Outcome of a login or signup attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Authenticated; no second factor required
    Session(AuthSession),
    /// The account requires a second factor before a session is issued
    MfaRequired(MfaChallenge),
}

impl LoginOutcome {
    pub fn session(self) -> Option<AuthSession> {
        match self {
            LoginOutcome::Session(session) => Some(session),
            LoginOutcome::MfaRequired(_) => None,
        }
    }

    pub fn mfa_challenge(self) -> Option<MfaChallenge> {
        match self {
            LoginOutcome::Session(_) => None,
            LoginOutcome::MfaRequired(challenge) => Some(challenge),
        }
    }
}
