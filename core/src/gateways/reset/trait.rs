//! Password-reset gateway trait.

use async_trait::async_trait;

use crate::errors::FlowResult;
use crate::gateways::types::{ResendReceipt, ResetSession};
use vf_shared::types::SubjectId;

/// Port for the password-reset endpoints of the account service
#[async_trait]
pub trait PasswordResetGateway: Send + Sync {
    /// `POST /auth/password-reset/request` — opens a reset session and
    /// sends an OTP to the account email
    async fn request(&self, email: &str) -> FlowResult<ResetSession>;

    /// `POST /auth/password-reset/verify-otp` — on success the server
    /// issues the single-use reset token
    async fn verify_otp(&self, session_id: &SubjectId, code: &str) -> FlowResult<String>;

    /// `POST /auth/password-reset/resend-otp`
    async fn resend_otp(&self, session_id: &SubjectId) -> FlowResult<ResendReceipt>;

    /// `POST /auth/password-reset/complete`
    async fn complete(&self, reset_token: &str, new_password: &str) -> FlowResult<()>;
}
