//! Contact-change gateway trait: the four-phase saga endpoints, per
//! contact channel (email or phone).

use async_trait::async_trait;

use crate::domain::entities::contact_change::ContactChannel;
use crate::errors::FlowResult;
use crate::gateways::types::{
    ChangeAuthorization, ChangeCompletion, ChangeSubmission, IdentityVerification, ResendReceipt,
};
use vf_shared::types::SubjectId;

/// Port for the contact-change endpoints of the account service.
///
/// Every post-identity operation carries the `change_request_id`
/// capability issued by [`verify_identity`](ContactChangeGateway::verify_identity).
#[async_trait]
pub trait ContactChangeGateway: Send + Sync {
    /// `POST /account/{channel}/request-identity-verification` — send an
    /// OTP to the *current* contact point
    async fn request_identity_verification(
        &self,
        channel: ContactChannel,
    ) -> FlowResult<IdentityVerification>;

    /// `POST /account/{channel}/verify-identity`
    async fn verify_identity(
        &self,
        channel: ContactChannel,
        verification_id: &SubjectId,
        otp_code: &str,
    ) -> FlowResult<ChangeAuthorization>;

    /// `POST /account/{channel}/submit-new-{email|phone}` — the server
    /// counts the request against the daily quota and sends an OTP to the
    /// *new* contact point
    async fn submit_new_value(
        &self,
        channel: ContactChannel,
        change_request_id: &SubjectId,
        new_value: &str,
    ) -> FlowResult<ChangeSubmission>;

    /// `POST /account/{channel}/verify-new-{email|phone}` — applies the
    /// change and returns the revert token
    async fn verify_new_value(
        &self,
        channel: ContactChannel,
        change_request_id: &SubjectId,
        verification_id: &SubjectId,
        otp_code: &str,
    ) -> FlowResult<ChangeCompletion>;

    /// `POST /account/{channel}/resend-otp`
    async fn resend_otp(
        &self,
        channel: ContactChannel,
        verification_id: &SubjectId,
    ) -> FlowResult<ResendReceipt>;

    /// `POST /account/{channel}/revert` — single-use undo within the
    /// revert window
    async fn revert(&self, channel: ContactChannel, revert_token: &str) -> FlowResult<()>;
}
