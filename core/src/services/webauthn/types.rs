//! Ceremony phase and kind definitions

use serde::{Deserialize, Serialize};

/// Which ceremony is being run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CeremonyKind {
    /// Enroll a new credential (attestation)
    Registration,
    /// Prove possession of an existing credential (assertion)
    Authentication,
}

/// Explicit ceremony phase.
///
/// Cancellation is only meaningful during `AwaitingUser`; the platform
/// owns the prompt and its cancellation semantics, and there is no
/// client-side timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CeremonyPhase {
    Idle,
    /// Fetching ceremony options from the server
    Requested,
    /// Suspended on the platform credential prompt
    AwaitingUser,
    /// Submitting the signed result for verification
    Verifying,
    Complete,
}

impl CeremonyPhase {
    /// Whether user-driven cancellation can still occur
    pub fn is_cancellable(&self) -> bool {
        matches!(self, CeremonyPhase::AwaitingUser)
    }
}
