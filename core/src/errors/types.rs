//! Flow-specific error types for verification and ceremony operations
//!
//! This module provides error type definitions for the step strategies and
//! flow controllers. Every variant carries a human-readable message; raw
//! platform or vendor error names never reach these types.

use thiserror::Error;

/// Input validation errors, caught before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Verification code must be {expected} digits")]
    InvalidCodeFormat { expected: usize },

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid phone number: {phone}")]
    InvalidPhoneFormat { phone: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },
}

/// Challenge rejections from the account service, recoverable by
/// retry or resend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChallengeError {
    #[error("Incorrect verification code")]
    InvalidCode { remaining_attempts: Option<i32> },

    #[error("Verification code expired")]
    CodeExpired,

    #[error("This challenge is no longer valid. Please start again")]
    ChallengeExpired,

    #[error("Maximum attempts exceeded. Please request a new code")]
    MaxAttemptsExceeded,

    #[error("Too many requests. Please try again in {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("Daily change limit reached ({requests_today}/{daily_cap})")]
    QuotaExceeded { requests_today: u32, daily_cap: u32 },

    #[error("Passkey could not be verified")]
    AssertionRejected,

    #[error("This link has already been used or has expired")]
    RevertTokenInvalid,
}

/// Platform credential ceremony failures, mapped from the authenticator's
/// error discriminator (never its free text)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeremonyError {
    #[error("Passkey request was cancelled")]
    Cancelled,

    #[error("Passkeys are not supported on this device or browser")]
    Unsupported,

    #[error("Passkeys require a secure connection")]
    InsecureContext,

    #[error("A passkey for this account already exists on this device")]
    CredentialExists,

    #[error("Passkey operation was interrupted")]
    Aborted,

    #[error("Something went wrong with the passkey request")]
    Unknown,
}

impl CeremonyError {
    /// Whether the user can retry the same method on this device
    pub fn is_retryable(&self) -> bool {
        !matches!(self, CeremonyError::Unsupported | CeremonyError::InsecureContext)
    }
}

/// Realtime channel failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Live updates interrupted, retrying")]
    Degraded { attempt: u32 },

    #[error("Live updates unavailable")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_human_readable() {
        let error = ChallengeError::RateLimited {
            retry_after_secs: 30,
        };
        assert_eq!(
            error.to_string(),
            "Too many requests. Please try again in 30 seconds"
        );

        let error = ChallengeError::QuotaExceeded {
            requests_today: 3,
            daily_cap: 3,
        };
        assert!(error.to_string().contains("3/3"));
    }

    #[test]
    fn test_ceremony_error_retryability() {
        assert!(CeremonyError::Cancelled.is_retryable());
        assert!(CeremonyError::Aborted.is_retryable());
        assert!(!CeremonyError::Unsupported.is_retryable());
        assert!(!CeremonyError::InsecureContext.is_retryable());
    }

    #[test]
    fn test_no_vendor_names_in_messages() {
        for error in [
            CeremonyError::Cancelled,
            CeremonyError::Unsupported,
            CeremonyError::InsecureContext,
            CeremonyError::CredentialExists,
            CeremonyError::Aborted,
            CeremonyError::Unknown,
        ] {
            let message = error.to_string();
            assert!(!message.contains("DOMException"));
            assert!(!message.contains("NotAllowedError"));
        }
    }
}
