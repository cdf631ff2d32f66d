//! Authentication gateway trait: signup, login, and second-factor
//! verification against an existing MFA challenge.

use async_trait::async_trait;

use crate::domain::value_objects::auth_session::{AuthSession, LoginOutcome};
use crate::errors::FlowResult;
use crate::gateways::types::{
    CeremonyOptions, LoginRequest, ResendReceipt, SignedCredential, SignupRequest,
};
use vf_shared::types::SubjectId;

/// Port for the authentication endpoints of the account service
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// `POST /auth/signup`
    async fn signup(&self, request: SignupRequest) -> FlowResult<LoginOutcome>;

    /// `POST /auth/login`
    async fn login(&self, request: LoginRequest) -> FlowResult<LoginOutcome>;

    /// `POST /auth/mfa/totp/verify` — answer a challenge with an
    /// authenticator-app code
    async fn verify_totp(&self, session_id: &SubjectId, code: &str) -> FlowResult<AuthSession>;

    /// `POST /auth/mfa/sms/send` — deliver (or redeliver) the SMS code for
    /// a challenge
    async fn send_mfa_sms(&self, session_id: &SubjectId) -> FlowResult<ResendReceipt>;

    /// `POST /auth/mfa/sms/verify`
    async fn verify_mfa_sms(&self, session_id: &SubjectId, code: &str) -> FlowResult<AuthSession>;

    /// `POST /auth/mfa/passkey/options` — fetch ceremony options.
    /// `session_id` is present for authentication-during-MFA and absent
    /// for a fresh passkey login.
    async fn passkey_options(&self, session_id: Option<&SubjectId>) -> FlowResult<CeremonyOptions>;

    /// `POST /auth/mfa/passkey/verify` — submit the signed assertion
    async fn verify_passkey(
        &self,
        session_id: Option<&SubjectId>,
        credential: SignedCredential,
    ) -> FlowResult<AuthSession>;
}
