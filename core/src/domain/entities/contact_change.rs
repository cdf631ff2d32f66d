//! Contact-change saga state: changing a verified email or phone.

use serde::{Deserialize, Serialize};
use std::fmt;
use vf_shared::types::SubjectId;

/// Which verified contact point is being replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactChannel {
    Email,
    Phone,
}

impl ContactChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactChannel::Email => "email",
            ContactChannel::Phone => "phone",
        }
    }
}

impl fmt::Display for ContactChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Phase of the four-step contact-change saga
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactChangePhase {
    /// Confirm who you are via OTP to the current contact point
    Identity,
    /// Submit the replacement value
    NewValue,
    /// OTP to the new contact point
    Verify,
    /// Change applied; revert token available
    Success,
}

/// State owned by one contact-change saga instance.
///
/// `change_request_id` is a short-lived capability: produced only after
/// identity verification succeeds, required by every subsequent call in the
/// same saga.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactChangeState {
    pub phase: ContactChangePhase,

    /// Id of the OTP sent to the current contact point
    pub identity_verification_id: Option<SubjectId>,

    /// Capability issued by successful identity verification
    pub change_request_id: Option<SubjectId>,

    /// Id of the OTP sent to the new contact point
    pub change_verification_id: Option<SubjectId>,

    /// Server-enforced daily counter, surfaced for display only
    pub change_requests_today: u32,

    /// Single-use, time-boxed revert credential; present only in `Success`
    pub revert_token: Option<String>,

    /// Inline step-local error text, if any
    pub error: Option<String>,
}

impl ContactChangeState {
    pub fn new() -> Self {
        Self {
            phase: ContactChangePhase::Identity,
            identity_verification_id: None,
            change_request_id: None,
            change_verification_id: None,
            change_requests_today: 0,
            revert_token: None,
            error: None,
        }
    }

    /// The phase `back()` lands on, if backward movement is legal from the
    /// current phase. Success has no predecessor: the saga is complete.
    pub fn previous_phase(&self) -> Option<ContactChangePhase> {
        match self.phase {
            ContactChangePhase::Identity => None,
            ContactChangePhase::NewValue => Some(ContactChangePhase::Identity),
            ContactChangePhase::Verify => Some(ContactChangePhase::NewValue),
            ContactChangePhase::Success => None,
        }
    }
}

impl Default for ContactChangeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_targets() {
        let mut state = ContactChangeState::new();
        assert_eq!(state.previous_phase(), None);

        state.phase = ContactChangePhase::NewValue;
        assert_eq!(state.previous_phase(), Some(ContactChangePhase::Identity));

        state.phase = ContactChangePhase::Verify;
        assert_eq!(state.previous_phase(), Some(ContactChangePhase::NewValue));

        state.phase = ContactChangePhase::Success;
        assert_eq!(state.previous_phase(), None);
    }
}
