//! Mobile verification gateway trait.
//!
//! The push channel for these verifications is a separate port
//! ([`crate::services::realtime::EventChannel`]); this trait covers the
//! request/response operations only.

use async_trait::async_trait;

use crate::domain::entities::verification_session::VerificationSession;
use crate::errors::FlowResult;
use crate::gateways::types::{
    InitiateMobileVerification, MobileVerificationStatus, ResendReceipt,
};

/// Port for the mobile-verification endpoints of the account service
#[async_trait]
pub trait MobileVerificationGateway: Send + Sync {
    /// `POST /mobile-verification/initiate` — opens a fresh verification
    /// session, superseding any prior one for this account
    async fn initiate(
        &self,
        request: InitiateMobileVerification,
    ) -> FlowResult<VerificationSession>;

    /// `POST /mobile-verification/resend`
    async fn resend(&self) -> FlowResult<ResendReceipt>;

    /// `POST /mobile-verification/verify-otp` — SMS-code completion path
    async fn verify_otp(&self, code: &str) -> FlowResult<MobileVerificationStatus>;

    /// `GET /mobile-verification/status` — polling fallback while the
    /// push channel is down
    async fn status(&self) -> FlowResult<MobileVerificationStatus>;
}
