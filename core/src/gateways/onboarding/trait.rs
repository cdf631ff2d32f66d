//! Onboarding gateway trait: guided-setup status plus the enrollment
//! operations driven from inside onboarding.

use async_trait::async_trait;

use crate::domain::entities::backup_codes::BackupCodes;
use crate::domain::entities::onboarding::OnboardingStatus;
use crate::errors::FlowResult;
use crate::gateways::types::{
    CeremonyOptions, RegisterRequest, ResendReceipt, SignedCredential, TotpEnrollment,
};
use vf_shared::types::SubjectId;

/// Port for the onboarding endpoints of the account service
#[async_trait]
pub trait OnboardingGateway: Send + Sync {
    /// `POST /onboarding/register`
    async fn register(&self, request: RegisterRequest) -> FlowResult<OnboardingStatus>;

    /// `POST /onboarding/start`
    async fn start(&self) -> FlowResult<OnboardingStatus>;

    /// `GET /onboarding/status` — always a fresh fetch; never cached
    /// across flow boundaries
    async fn status(&self) -> FlowResult<OnboardingStatus>;

    /// `POST /onboarding/verify-email`
    async fn verify_email(&self, otp: &str) -> FlowResult<OnboardingStatus>;

    /// `POST /onboarding/resend-email-otp`
    async fn resend_email_otp(&self) -> FlowResult<ResendReceipt>;

    /// `POST /onboarding/mfa/totp/initiate`
    async fn totp_initiate(&self) -> FlowResult<TotpEnrollment>;

    /// `POST /onboarding/mfa/totp/verify`
    async fn totp_verify(&self, code: &str) -> FlowResult<BackupCodes>;

    /// `POST /onboarding/mfa/sms/send`
    async fn sms_send(&self, phone: &str) -> FlowResult<SubjectId>;

    /// `POST /onboarding/mfa/sms/verify`
    async fn sms_verify(&self, session_id: &SubjectId, code: &str) -> FlowResult<BackupCodes>;

    /// `POST /onboarding/mfa/passkey/options`
    async fn passkey_options(&self) -> FlowResult<CeremonyOptions>;

    /// `POST /onboarding/mfa/passkey/verify`
    async fn passkey_verify(
        &self,
        session_id: &SubjectId,
        credential: SignedCredential,
    ) -> FlowResult<BackupCodes>;

    /// `POST /onboarding/mfa/skip`
    async fn skip_mfa(&self) -> FlowResult<OnboardingStatus>;
}
