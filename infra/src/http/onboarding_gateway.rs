//! Onboarding gateway over HTTP.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use vf_core::domain::entities::backup_codes::BackupCodes;
use vf_core::domain::entities::onboarding::OnboardingStatus;
use vf_core::errors::FlowResult;
use vf_core::gateways::onboarding::OnboardingGateway;
use vf_core::gateways::types::{
    CeremonyOptions, RegisterRequest, ResendReceipt, SignedCredential, TotpEnrollment,
};
use vf_shared::types::SubjectId;

use super::client::HttpClient;

#[derive(Debug, Serialize)]
struct OtpBody<'a> {
    otp: &'a str,
}

#[derive(Debug, Serialize)]
struct CodeBody<'a> {
    code: &'a str,
}

#[derive(Debug, Serialize)]
struct PhoneBody<'a> {
    phone: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionCodeBody<'a> {
    session_id: &'a str,
    code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasskeyVerifyBody<'a> {
    session_id: &'a str,
    assertion: &'a SignedCredential,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SmsSessionDto {
    session_id: SubjectId,
}

/// [`OnboardingGateway`] implementation against the account service
pub struct HttpOnboardingGateway {
    client: Arc<HttpClient>,
}

impl HttpOnboardingGateway {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OnboardingGateway for HttpOnboardingGateway {
    async fn register(&self, request: RegisterRequest) -> FlowResult<OnboardingStatus> {
        self.client.post("/onboarding/register", &request).await
    }

    async fn start(&self) -> FlowResult<OnboardingStatus> {
        self.client.post_empty("/onboarding/start").await
    }

    async fn status(&self) -> FlowResult<OnboardingStatus> {
        self.client.get("/onboarding/status").await
    }

    async fn verify_email(&self, otp: &str) -> FlowResult<OnboardingStatus> {
        self.client
            .post("/onboarding/verify-email", &OtpBody { otp })
            .await
    }

    async fn resend_email_otp(&self) -> FlowResult<ResendReceipt> {
        self.client.post_empty("/onboarding/resend-email-otp").await
    }

    async fn totp_initiate(&self) -> FlowResult<TotpEnrollment> {
        self.client.post_empty("/onboarding/mfa/totp/initiate").await
    }

    async fn totp_verify(&self, code: &str) -> FlowResult<BackupCodes> {
        self.client
            .post("/onboarding/mfa/totp/verify", &CodeBody { code })
            .await
    }

    async fn sms_send(&self, phone: &str) -> FlowResult<SubjectId> {
        let dto: SmsSessionDto = self
            .client
            .post("/onboarding/mfa/sms/send", &PhoneBody { phone })
            .await?;
        Ok(dto.session_id)
    }

    async fn sms_verify(&self, session_id: &SubjectId, code: &str) -> FlowResult<BackupCodes> {
        self.client
            .post(
                "/onboarding/mfa/sms/verify",
                &SessionCodeBody {
                    session_id: session_id.as_str(),
                    code,
                },
            )
            .await
    }

    async fn passkey_options(&self) -> FlowResult<CeremonyOptions> {
        self.client
            .post_empty("/onboarding/mfa/passkey/options")
            .await
    }

    async fn passkey_verify(
        &self,
        session_id: &SubjectId,
        credential: SignedCredential,
    ) -> FlowResult<BackupCodes> {
        self.client
            .post(
                "/onboarding/mfa/passkey/verify",
                &PasskeyVerifyBody {
                    session_id: session_id.as_str(),
                    assertion: &credential,
                },
            )
            .await
    }

    async fn skip_mfa(&self) -> FlowResult<OnboardingStatus> {
        self.client.post_empty("/onboarding/mfa/skip").await
    }
}
