//! Flow orchestration timing configuration

use serde::{Deserialize, Serialize};

/// Number of digits in a one-time code
pub const OTP_LENGTH: usize = 6;

/// Default seconds a user must wait between code resend requests
pub const DEFAULT_RESEND_COOLDOWN_SECS: u64 = 60;

/// Hours a contact-change revert token stays usable
pub const REVERT_WINDOW_HOURS: i64 = 72;

/// Server-enforced daily cap on contact-change requests, surfaced for display
pub const CONTACT_CHANGE_DAILY_CAP: u32 = 3;

/// Timing configuration for guided flows
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlowConfig {
    /// Seconds between code resend requests
    #[serde(default = "default_resend_cooldown")]
    pub resend_cooldown_secs: u64,

    /// Seconds the contact-change success screen stays up before the saga
    /// self-disposes
    #[serde(default = "default_success_display")]
    pub success_display_secs: u64,

    /// Seconds between status polls while the push channel is down
    #[serde(default = "default_status_poll")]
    pub status_poll_secs: u64,
}

fn default_resend_cooldown() -> u64 {
    DEFAULT_RESEND_COOLDOWN_SECS
}

fn default_success_display() -> u64 {
    8
}

fn default_status_poll() -> u64 {
    5
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            resend_cooldown_secs: default_resend_cooldown(),
            success_display_secs: default_success_display(),
            status_poll_secs: default_status_poll(),
        }
    }
}
