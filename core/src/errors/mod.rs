//! Flow error types and error handling.

mod types;

// Re-export all error types
pub use types::{ChallengeError, ChannelError, CeremonyError, ValidationError};

use thiserror::Error;

/// Umbrella error for all flow operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Flow-fatal: the session behind the flow is gone
    #[error("Your session has expired. Please sign in again")]
    SessionExpired,

    /// Flow-fatal: the server reported a step this client cannot render
    #[error("This step is not available. Returning to the start")]
    UnknownStep { step: String },

    #[error("Could not reach the service. Please try again")]
    Gateway { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Challenge(#[from] ChallengeError),

    #[error(transparent)]
    Ceremony(#[from] CeremonyError),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl FlowError {
    /// Flow-fatal errors bypass the current step: the controller redirects
    /// to the flow's entry point instead of rendering inline
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FlowError::SessionExpired | FlowError::UnknownStep { .. }
        )
    }

    /// Human-readable text for display; never a raw vendor error name
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

pub type FlowResult<T> = Result<T, FlowError>;
