//! Password reset flow.

pub mod flow;

pub use flow::{PasswordResetFlow, ResetStage};
