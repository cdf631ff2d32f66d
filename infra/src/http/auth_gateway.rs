//! Authentication gateway over HTTP.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use vf_core::domain::entities::mfa_challenge::MfaChallenge;
use vf_core::domain::entities::onboarding::OnboardingStep;
use vf_core::domain::value_objects::auth_session::{AuthSession, LoginOutcome};
use vf_core::errors::{FlowError, FlowResult};
use vf_core::gateways::auth::AuthGateway;
use vf_core::gateways::types::{
    CeremonyOptions, LoginRequest, ResendReceipt, SignedCredential, SignupRequest,
};
use vf_shared::types::SubjectId;

use super::client::HttpClient;

/// Wire shape of a login/signup response: either a session or a
/// second-factor challenge
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponseDto {
    #[serde(default)]
    mfa_required: bool,
    challenge: Option<MfaChallenge>,
    access_token: Option<String>,
    expires_in: Option<i64>,
    #[serde(default)]
    requires_onboarding: bool,
    onboarding_step: Option<OnboardingStep>,
}

impl LoginResponseDto {
    fn into_outcome(self) -> FlowResult<LoginOutcome> {
        if self.mfa_required {
            let challenge = self.challenge.ok_or(FlowError::Gateway {
                message: "mfa required without a challenge".to_string(),
            })?;
            return Ok(LoginOutcome::MfaRequired(challenge));
        }
        let access_token = self.access_token.ok_or(FlowError::Gateway {
            message: "login response without an access token".to_string(),
        })?;
        Ok(LoginOutcome::Session(AuthSession {
            access_token,
            expires_in: self.expires_in.unwrap_or(0),
            requires_onboarding: self.requires_onboarding,
            onboarding_step: self.onboarding_step,
        }))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionCodeBody<'a> {
    session_id: &'a str,
    code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionBody<'a> {
    session_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OptionalSessionBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasskeyVerifyBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
    assertion: &'a SignedCredential,
}

/// [`AuthGateway`] implementation against the account service.
///
/// A session returned by any verification path installs its access token
/// on the shared client, so follow-up onboarding calls are authorized.
pub struct HttpAuthGateway {
    client: Arc<HttpClient>,
}

impl HttpAuthGateway {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    fn adopt(&self, session: AuthSession) -> AuthSession {
        self.client.set_bearer(session.access_token.clone());
        session
    }

    fn adopt_outcome(&self, outcome: LoginOutcome) -> LoginOutcome {
        if let LoginOutcome::Session(session) = &outcome {
            self.client.set_bearer(session.access_token.clone());
        }
        outcome
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn signup(&self, request: SignupRequest) -> FlowResult<LoginOutcome> {
        let dto: LoginResponseDto = self.client.post("/auth/signup", &request).await?;
        Ok(self.adopt_outcome(dto.into_outcome()?))
    }

    async fn login(&self, request: LoginRequest) -> FlowResult<LoginOutcome> {
        let dto: LoginResponseDto = self.client.post("/auth/login", &request).await?;
        Ok(self.adopt_outcome(dto.into_outcome()?))
    }

    async fn verify_totp(&self, session_id: &SubjectId, code: &str) -> FlowResult<AuthSession> {
        let session = self
            .client
            .post(
                "/auth/mfa/totp/verify",
                &SessionCodeBody {
                    session_id: session_id.as_str(),
                    code,
                },
            )
            .await?;
        Ok(self.adopt(session))
    }

    async fn send_mfa_sms(&self, session_id: &SubjectId) -> FlowResult<ResendReceipt> {
        self.client
            .post(
                "/auth/mfa/sms/send",
                &SessionBody {
                    session_id: session_id.as_str(),
                },
            )
            .await
    }

    async fn verify_mfa_sms(&self, session_id: &SubjectId, code: &str) -> FlowResult<AuthSession> {
        let session = self
            .client
            .post(
                "/auth/mfa/sms/verify",
                &SessionCodeBody {
                    session_id: session_id.as_str(),
                    code,
                },
            )
            .await?;
        Ok(self.adopt(session))
    }

    async fn passkey_options(
        &self,
        session_id: Option<&SubjectId>,
    ) -> FlowResult<CeremonyOptions> {
        self.client
            .post(
                "/auth/mfa/passkey/options",
                &OptionalSessionBody {
                    session_id: session_id.map(SubjectId::as_str),
                },
            )
            .await
    }

    async fn verify_passkey(
        &self,
        session_id: Option<&SubjectId>,
        credential: SignedCredential,
    ) -> FlowResult<AuthSession> {
        let session = self
            .client
            .post(
                "/auth/mfa/passkey/verify",
                &PasskeyVerifyBody {
                    session_id: session_id.map(SubjectId::as_str),
                    assertion: &credential,
                },
            )
            .await?;
        Ok(self.adopt(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_dto_splits_session_and_challenge() {
        let json = r#"{
            "mfaRequired": true,
            "challenge": {
                "sessionId": "mfa-1",
                "availableMethods": ["totp", "sms"],
                "defaultMethod": "totp",
                "maskedPhone": "+61****5678"
            }
        }"#;
        let dto: LoginResponseDto = serde_json::from_str(json).unwrap();
        let outcome = dto.into_outcome().unwrap();
        assert!(matches!(outcome, LoginOutcome::MfaRequired(_)));

        let json = r#"{
            "accessToken": "at-1",
            "expiresIn": 900,
            "requiresOnboarding": true,
            "onboardingStep": "EMAIL_VERIFICATION"
        }"#;
        let dto: LoginResponseDto = serde_json::from_str(json).unwrap();
        match dto.into_outcome().unwrap() {
            LoginOutcome::Session(session) => {
                assert!(session.requires_onboarding);
                assert_eq!(
                    session.onboarding_step,
                    Some(OnboardingStep::EmailVerification)
                );
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_mfa_required_without_challenge_is_a_gateway_error() {
        let json = r#"{"mfaRequired": true}"#;
        let dto: LoginResponseDto = serde_json::from_str(json).unwrap();
        assert!(dto.into_outcome().is_err());
    }

    #[test]
    fn test_passkey_body_omits_absent_session() {
        let credential = SignedCredential {
            credential_id: "cred-1".to_string(),
            payload: serde_json::json!({}),
        };
        let body = PasskeyVerifyBody {
            session_id: None,
            assertion: &credential,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("sessionId").is_none());
    }
}
