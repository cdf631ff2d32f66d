//! One-time-code challenge unit and resend gating.
//!
//! The OTP unit drives a 6-digit code input to completion: auto-submits
//! the instant the final digit lands, suppresses duplicate submissions
//! while one is in flight, and gates resends behind a monotonic cooldown.

pub mod challenge;
pub mod config;
pub mod resend_timer;

pub use challenge::{OtpChallenge, OtpSubmitter};
pub use config::{ClearPolicy, OtpConfig};
pub use resend_timer::ResendTimer;
