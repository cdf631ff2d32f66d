//! Step-strategy signals.
//!
//! Every step strategy (OTP challenge, passkey ceremony, realtime
//! listener) reports back to its flow controller with one of these
//! signals: advance with an optional payload, or stay with an error.

use crate::domain::entities::backup_codes::BackupCodes;
use crate::domain::entities::onboarding::OnboardingStatus;
use crate::domain::value_objects::auth_session::AuthSession;
use crate::errors::FlowError;

/// Payload carried by an advance signal
#[derive(Debug, Clone, PartialEq)]
pub enum StepArtifact {
    None,
    /// A login session (MFA verification, passkey authentication)
    Session(AuthSession),
    /// Enrollment completion payload
    BackupCodes(BackupCodes),
    /// A fresh authoritative status returned by the step's own endpoint
    Status(OnboardingStatus),
    /// A password-reset token
    ResetToken(String),
    /// A contact-change revert token
    RevertToken(String),
}

/// What a step strategy tells the controller after one invocation
#[derive(Debug, Clone, PartialEq)]
pub enum StepSignal {
    /// Move sub-progress forward, optionally carrying a payload
    Advance { artifact: StepArtifact },
    /// Stay on the current step and surface the error inline
    Stay { error: FlowError },
}

impl StepSignal {
    pub fn advance() -> Self {
        StepSignal::Advance {
            artifact: StepArtifact::None,
        }
    }

    pub fn advance_with(artifact: StepArtifact) -> Self {
        StepSignal::Advance { artifact }
    }

    pub fn stay(error: impl Into<FlowError>) -> Self {
        StepSignal::Stay {
            error: error.into(),
        }
    }
}
