//! Configuration for the contact-change saga

use vf_shared::config::flow::{
    CONTACT_CHANGE_DAILY_CAP, DEFAULT_RESEND_COOLDOWN_SECS, REVERT_WINDOW_HOURS,
};

/// Configuration for a contact-change saga instance
#[derive(Debug, Clone)]
pub struct ContactChangeConfig {
    /// Seconds between OTP resend requests
    pub resend_cooldown_secs: u64,
    /// Seconds the success screen stays up before the saga self-disposes
    pub success_display_secs: u64,
    /// Daily request cap, displayed only; the server enforces it
    pub daily_cap: u32,
    /// Hours the revert token stays usable, displayed only
    pub revert_window_hours: i64,
}

impl Default for ContactChangeConfig {
    fn default() -> Self {
        Self {
            resend_cooldown_secs: DEFAULT_RESEND_COOLDOWN_SECS,
            success_display_secs: 8,
            daily_cap: CONTACT_CHANGE_DAILY_CAP,
            revert_window_hours: REVERT_WINDOW_HOURS,
        }
    }
}
