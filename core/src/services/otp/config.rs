//! Configuration for the OTP challenge unit

use vf_shared::config::flow::{DEFAULT_RESEND_COOLDOWN_SECS, OTP_LENGTH};

/// What happens to the code input after a rejected verification.
///
/// One explicit policy per unit instead of per-screen conventions:
/// identity/reset-style challenges clear the input on every failed
/// attempt; enrollment-style challenges keep it visible next to the
/// inline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearPolicy {
    ClearOnError,
    KeepOnError,
}

/// Configuration for an OTP challenge unit
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Number of digits in a complete code
    pub code_length: usize,
    /// Input handling after a rejected code
    pub clear_policy: ClearPolicy,
    /// Seconds between resend requests
    pub resend_cooldown_secs: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: OTP_LENGTH,
            clear_policy: ClearPolicy::KeepOnError,
            resend_cooldown_secs: DEFAULT_RESEND_COOLDOWN_SECS,
        }
    }
}

impl OtpConfig {
    /// Identity-proof style: clear the input on every rejected attempt
    pub fn identity() -> Self {
        Self {
            clear_policy: ClearPolicy::ClearOnError,
            ..Default::default()
        }
    }

    /// Enrollment style: keep the rejected code visible with the error
    pub fn enrollment() -> Self {
        Self {
            clear_policy: ClearPolicy::KeepOnError,
            ..Default::default()
        }
    }
}
