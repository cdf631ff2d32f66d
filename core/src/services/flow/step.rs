//! Pure step derivation.

use crate::domain::entities::mfa_challenge::MfaMethod;
use crate::domain::entities::onboarding::{OnboardingStatus, OnboardingStep};

use super::progress::SubProgress;

/// What the flow controller tells the surrounding application to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivedStep {
    /// Render this step at this sub-progress
    Render {
        step: OnboardingStep,
        sub_progress: u8,
        method: Option<MfaMethod>,
    },
    /// Onboarding is complete: leave the flow entirely (full navigation or
    /// reload, so any session-privilege upgrade is picked up)
    LeaveFlow,
    /// Fatal for this flow session: redirect to the flow's entry point
    /// instead of rendering nothing
    RedirectToEntry { reason: String },
}

/// Map authoritative remote state plus local sub-state to the step to
/// present.
///
/// Deterministic in its inputs, so the same status reproduces the same
/// UI after a page reload.
pub fn derive_step(
    status: &OnboardingStatus,
    sub_progress: SubProgress,
    method: Option<MfaMethod>,
) -> DerivedStep {
    if status.onboarding_complete {
        return DerivedStep::LeaveFlow;
    }
    match &status.current_step {
        OnboardingStep::Unknown(raw) => DerivedStep::RedirectToEntry { reason: raw.clone() },
        OnboardingStep::Complete => DerivedStep::LeaveFlow,
        step => DerivedStep::Render {
            step: step.clone(),
            sub_progress: sub_progress.value(),
            method,
        },
    }
}
