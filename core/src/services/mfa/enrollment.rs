//! MFA enrollment flow: set up a second factor during onboarding.

use async_trait::async_trait;
use std::sync::Arc;
use tracing;

use crate::domain::entities::backup_codes::BackupCodes;
use crate::domain::entities::mfa_challenge::MfaMethod;
use crate::domain::entities::onboarding::OnboardingStatus;
use crate::errors::{FlowError, FlowResult};
use crate::gateways::onboarding::OnboardingGateway;
use crate::gateways::types::{
    CeremonyOptions, ResendReceipt, SignedCredential, TotpEnrollment,
};
use crate::services::otp::{OtpChallenge, OtpConfig, OtpSubmitter};
use crate::services::webauthn::{CeremonyAdapter, CeremonyGateway, PlatformAuthenticator};
use vf_shared::types::SubjectId;
use vf_shared::utils::contact::is_valid_phone;

/// Binds the OTP unit to the enrollment verification endpoints
struct EnrollmentSubmitter<G: OnboardingGateway> {
    gateway: Arc<G>,
    method: MfaMethod,
    sms_session: Option<SubjectId>,
    phone: Option<String>,
}

#[async_trait]
impl<G: OnboardingGateway> OtpSubmitter for EnrollmentSubmitter<G> {
    type Artifact = BackupCodes;

    async fn submit(&self, code: &str) -> FlowResult<BackupCodes> {
        match self.method {
            MfaMethod::Totp => self.gateway.totp_verify(code).await,
            MfaMethod::Sms => {
                let session = self.sms_session.as_ref().ok_or(FlowError::Internal {
                    message: "sms session missing".to_string(),
                })?;
                self.gateway.sms_verify(session, code).await
            }
            MfaMethod::Passkey => Err(FlowError::Internal {
                message: "passkey method has no code path".to_string(),
            }),
        }
    }

    async fn resend(&self) -> FlowResult<ResendReceipt> {
        match (&self.method, &self.phone) {
            (MfaMethod::Sms, Some(phone)) => {
                self.gateway.sms_send(phone).await?;
                Ok(ResendReceipt {
                    message: None,
                    next_resend_secs: 0,
                })
            }
            _ => Ok(ResendReceipt {
                message: None,
                next_resend_secs: 0,
            }),
        }
    }
}

/// Binds the registration ceremony to the enrollment endpoints
struct EnrollmentCeremonyGateway<G: OnboardingGateway> {
    gateway: Arc<G>,
    session_id: std::sync::Mutex<Option<SubjectId>>,
}

#[async_trait]
impl<G: OnboardingGateway> CeremonyGateway for EnrollmentCeremonyGateway<G> {
    type Artifact = BackupCodes;

    async fn request_options(&self) -> FlowResult<CeremonyOptions> {
        let options = self.gateway.passkey_options().await?;
        *self.session_id.lock().unwrap() = options.session_id.clone();
        Ok(options)
    }

    async fn verify(&self, credential: SignedCredential) -> FlowResult<BackupCodes> {
        let session_id = self
            .session_id
            .lock()
            .unwrap()
            .clone()
            .ok_or(FlowError::Internal {
                message: "ceremony options carried no session id".to_string(),
            })?;
        self.gateway.passkey_verify(&session_id, credential).await
    }
}

/// Enrolls one MFA method and gates completion on backup-code
/// acknowledgment.
///
/// Every successful enrollment (TOTP code, SMS code, passkey
/// registration) yields [`BackupCodes`]; the flow is complete only after
/// the user acknowledges them. The server keeps no proof of display, so
/// the gate is local and deliberate.
pub struct MfaEnrollmentFlow<G: OnboardingGateway, A: PlatformAuthenticator> {
    gateway: Arc<G>,
    authenticator: Arc<A>,
    method: Option<MfaMethod>,
    totp: Option<TotpEnrollment>,
    unit: Option<OtpChallenge<EnrollmentSubmitter<G>>>,
    backup_codes: Option<BackupCodes>,
    error: Option<FlowError>,
}

impl<G: OnboardingGateway, A: PlatformAuthenticator> MfaEnrollmentFlow<G, A> {
    pub fn new(gateway: Arc<G>, authenticator: Arc<A>) -> Self {
        Self {
            gateway,
            authenticator,
            method: None,
            totp: None,
            unit: None,
            backup_codes: None,
            error: None,
        }
    }

    pub fn method(&self) -> Option<MfaMethod> {
        self.method
    }

    pub fn totp_enrollment(&self) -> Option<&TotpEnrollment> {
        self.totp.as_ref()
    }

    pub fn backup_codes(&self) -> Option<&BackupCodes> {
        self.backup_codes.as_ref()
    }

    pub fn error(&self) -> Option<&FlowError> {
        self.error
            .as_ref()
            .or_else(|| self.unit.as_ref().and_then(|unit| unit.error()))
    }

    /// Enrollment is complete once backup codes exist and were
    /// acknowledged
    pub fn is_complete(&self) -> bool {
        self.backup_codes
            .as_ref()
            .map(|codes| codes.is_acknowledged())
            .unwrap_or(false)
    }

    /// Begin TOTP enrollment: fetch the shared secret and QR URL
    pub async fn start_totp(&mut self) -> FlowResult<TotpEnrollment> {
        let enrollment = self.gateway.totp_initiate().await?;
        self.method = Some(MfaMethod::Totp);
        self.totp = Some(enrollment.clone());
        self.unit = Some(OtpChallenge::new(
            Arc::new(EnrollmentSubmitter {
                gateway: Arc::clone(&self.gateway),
                method: MfaMethod::Totp,
                sms_session: None,
                phone: None,
            }),
            // Enrollment style: a rejected code stays visible
            OtpConfig::enrollment(),
        ));
        self.error = None;
        tracing::info!(event = "mfa_totp_started", "TOTP enrollment started");
        Ok(enrollment)
    }

    /// Begin SMS enrollment: send a code to the given phone
    pub async fn start_sms(&mut self, phone: &str) -> FlowResult<bool> {
        if !is_valid_phone(phone) {
            self.error = Some(
                crate::errors::ValidationError::InvalidPhoneFormat {
                    phone: vf_shared::utils::contact::mask_phone_number(phone),
                }
                .into(),
            );
            return Ok(false);
        }
        let session = self.gateway.sms_send(phone).await?;
        self.method = Some(MfaMethod::Sms);
        self.unit = Some(OtpChallenge::new(
            Arc::new(EnrollmentSubmitter {
                gateway: Arc::clone(&self.gateway),
                method: MfaMethod::Sms,
                sms_session: Some(session),
                phone: Some(phone.to_string()),
            }),
            OtpConfig::enrollment(),
        ));
        self.error = None;
        tracing::info!(event = "mfa_sms_started", "SMS enrollment started");
        Ok(true)
    }

    /// Enter one code digit for the active TOTP/SMS enrollment
    pub async fn push_digit(&mut self, digit: char) -> FlowResult<Option<&BackupCodes>> {
        let Some(unit) = self.unit.as_mut() else {
            return Ok(None);
        };
        if let Some(codes) = unit.push_digit(digit).await? {
            self.adopt(codes);
            return Ok(self.backup_codes.as_ref());
        }
        Ok(None)
    }

    /// Explicit submit path for the active enrollment
    pub async fn submit(&mut self) -> FlowResult<Option<&BackupCodes>> {
        let Some(unit) = self.unit.as_mut() else {
            return Ok(None);
        };
        if let Some(codes) = unit.submit().await? {
            self.adopt(codes);
            return Ok(self.backup_codes.as_ref());
        }
        Ok(None)
    }

    /// Resend the SMS enrollment code, gated by the cooldown
    pub async fn resend(&mut self) -> FlowResult<bool> {
        match self.unit.as_mut() {
            Some(unit) => unit.resend().await,
            None => Ok(false),
        }
    }

    /// Run the passkey registration ceremony.
    ///
    /// Step-local ceremony failures are absorbed into
    /// [`error`](Self::error); `unsupported`/`insecure-context` are
    /// terminal for this method and the user must pick another.
    pub async fn register_passkey(&mut self) -> FlowResult<Option<&BackupCodes>> {
        let adapter = CeremonyAdapter::registration(
            Arc::new(EnrollmentCeremonyGateway {
                gateway: Arc::clone(&self.gateway),
                session_id: std::sync::Mutex::new(None),
            }),
            Arc::clone(&self.authenticator),
        );
        match adapter.run().await {
            Ok(codes) => {
                self.method = Some(MfaMethod::Passkey);
                self.adopt(codes);
                Ok(self.backup_codes.as_ref())
            }
            Err(error) if error.is_fatal() => Err(error),
            Err(error) => {
                self.error = Some(error);
                Ok(None)
            }
        }
    }

    /// Confirm the backup codes were saved; completes the enrollment
    pub fn acknowledge_backup_codes(&mut self) -> bool {
        match self.backup_codes.as_mut() {
            Some(codes) => {
                codes.acknowledge();
                tracing::info!(
                    event = "mfa_enrollment_complete",
                    "Backup codes acknowledged; enrollment complete"
                );
                true
            }
            None => false,
        }
    }

    /// Skip MFA setup where the server allows it; returns the fresh
    /// authoritative status
    pub async fn skip(&self) -> FlowResult<OnboardingStatus> {
        self.gateway.skip_mfa().await
    }

    fn adopt(&mut self, codes: BackupCodes) {
        tracing::info!(
            method = ?self.method,
            event = "mfa_enrolled",
            "MFA method enrolled; backup codes issued"
        );
        self.backup_codes = Some(codes);
        self.error = None;
        self.unit = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CeremonyError, ChallengeError};
    use crate::gateways::onboarding::MockOnboardingGateway;
    use crate::services::webauthn::{AuthenticatorError, AuthenticatorErrorKind};

    struct PromptAuthenticator {
        error: Option<AuthenticatorErrorKind>,
    }

    #[async_trait]
    impl PlatformAuthenticator for PromptAuthenticator {
        async fn create_credential(
            &self,
            _options: &CeremonyOptions,
        ) -> Result<SignedCredential, AuthenticatorError> {
            match self.error {
                None => Ok(SignedCredential {
                    credential_id: "cred-1".to_string(),
                    payload: serde_json::json!({"attestation": "YXR0"}),
                }),
                Some(kind) => Err(AuthenticatorError::new(kind)),
            }
        }

        async fn get_assertion(
            &self,
            _options: &CeremonyOptions,
        ) -> Result<SignedCredential, AuthenticatorError> {
            unreachable!("enrollment never asserts")
        }
    }

    #[tokio::test]
    async fn test_totp_enrollment_to_acknowledged_completion() {
        let gateway = Arc::new(MockOnboardingGateway::new());
        let mut flow = MfaEnrollmentFlow::new(
            gateway.clone(),
            Arc::new(PromptAuthenticator { error: None }),
        );

        let enrollment = flow.start_totp().await.unwrap();
        assert!(enrollment.otpauth_url.starts_with("otpauth://"));

        for digit in "123456".chars() {
            flow.push_digit(digit).await.unwrap();
        }
        assert!(flow.backup_codes().is_some());
        assert!(!flow.is_complete());

        assert!(flow.acknowledge_backup_codes());
        assert!(flow.is_complete());
        assert_eq!(gateway.submitted_codes(), vec!["123456"]);
    }

    #[tokio::test]
    async fn test_rejected_code_keeps_input_visible() {
        let gateway = Arc::new(MockOnboardingGateway::new());
        gateway.push_code_result(Err(ChallengeError::InvalidCode {
            remaining_attempts: Some(2),
        }
        .into()));
        let mut flow = MfaEnrollmentFlow::new(
            gateway,
            Arc::new(PromptAuthenticator { error: None }),
        );

        flow.start_totp().await.unwrap();
        for digit in "999999".chars() {
            flow.push_digit(digit).await.unwrap();
        }
        assert!(flow.backup_codes().is_none());
        assert!(flow.error().is_some());

        // Enrollment-style policy: the code is still there for correction
        let retried = flow.submit().await.unwrap();
        assert!(retried.is_some());
    }

    #[tokio::test]
    async fn test_sms_enrollment_validates_phone_first() {
        let gateway = Arc::new(MockOnboardingGateway::new());
        let mut flow = MfaEnrollmentFlow::new(
            gateway.clone(),
            Arc::new(PromptAuthenticator { error: None }),
        );

        assert!(!flow.start_sms("not-a-phone").await.unwrap());
        assert!(flow.error().is_some());
        assert_eq!(gateway.resend_count(), 0);

        assert!(flow.start_sms("+61412345678").await.unwrap());
        assert_eq!(flow.method(), Some(MfaMethod::Sms));
    }

    #[tokio::test]
    async fn test_passkey_registration_yields_backup_codes() {
        let gateway = Arc::new(MockOnboardingGateway::new());
        let mut flow = MfaEnrollmentFlow::new(
            gateway,
            Arc::new(PromptAuthenticator { error: None }),
        );

        let codes = flow.register_passkey().await.unwrap();
        assert!(codes.is_some());
        assert_eq!(flow.method(), Some(MfaMethod::Passkey));
    }

    #[tokio::test]
    async fn test_unsupported_device_is_terminal_for_the_method() {
        let gateway = Arc::new(MockOnboardingGateway::new());
        let mut flow = MfaEnrollmentFlow::new(
            gateway,
            Arc::new(PromptAuthenticator {
                error: Some(AuthenticatorErrorKind::NotSupported),
            }),
        );

        let outcome = flow.register_passkey().await.unwrap();
        assert!(outcome.is_none());
        match flow.error() {
            Some(FlowError::Ceremony(error)) => {
                assert_eq!(*error, CeremonyError::Unsupported);
                assert!(!error.is_retryable());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
