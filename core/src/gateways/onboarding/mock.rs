//! Mock implementation of OnboardingGateway for testing

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::entities::backup_codes::BackupCodes;
use crate::domain::entities::onboarding::{OnboardingStatus, OnboardingStep, SignupMethod};
use crate::errors::FlowResult;
use crate::gateways::types::{
    CeremonyOptions, RegisterRequest, ResendReceipt, SignedCredential, TotpEnrollment,
};
use vf_shared::types::SubjectId;

use super::r#trait::OnboardingGateway;

/// Scripted onboarding gateway. `status()` serves queued snapshots (the
/// last one repeats once the queue drains) so tests can walk a controller
/// through server-step transitions.
pub struct MockOnboardingGateway {
    statuses: Mutex<VecDeque<OnboardingStatus>>,
    last_status: Mutex<Option<OnboardingStatus>>,
    verify_email_results: Mutex<VecDeque<FlowResult<OnboardingStatus>>>,
    code_results: Mutex<VecDeque<FlowResult<BackupCodes>>>,
    submitted_codes: Mutex<Vec<String>>,
    resend_count: Mutex<u32>,
}

impl MockOnboardingGateway {
    pub fn new() -> Self {
        Self {
            statuses: Mutex::new(VecDeque::new()),
            last_status: Mutex::new(None),
            verify_email_results: Mutex::new(VecDeque::new()),
            code_results: Mutex::new(VecDeque::new()),
            submitted_codes: Mutex::new(Vec::new()),
            resend_count: Mutex::new(0),
        }
    }

    /// Status fixture at a given step
    pub fn status_fixture(step: OnboardingStep) -> OnboardingStatus {
        let complete = step == OnboardingStep::Complete;
        OnboardingStatus {
            current_step: step,
            onboarding_complete: complete,
            email: "alice@example.com".to_string(),
            signup_method: SignupMethod::Email,
            email_verified: complete,
            phone_verified: complete,
        }
    }

    pub fn backup_codes_fixture() -> BackupCodes {
        BackupCodes::new(
            vec!["aaaa-1111".to_string(), "bbbb-2222".to_string()],
            Some("Store these somewhere safe".to_string()),
        )
    }

    pub fn push_status(&self, status: OnboardingStatus) {
        self.statuses.lock().unwrap().push_back(status);
    }

    pub fn push_verify_email(&self, result: FlowResult<OnboardingStatus>) {
        self.verify_email_results.lock().unwrap().push_back(result);
    }

    pub fn push_code_result(&self, result: FlowResult<BackupCodes>) {
        self.code_results.lock().unwrap().push_back(result);
    }

    pub fn submitted_codes(&self) -> Vec<String> {
        self.submitted_codes.lock().unwrap().clone()
    }

    pub fn resend_count(&self) -> u32 {
        *self.resend_count.lock().unwrap()
    }

    fn next_status(&self) -> OnboardingStatus {
        let mut queue = self.statuses.lock().unwrap();
        let mut last = self.last_status.lock().unwrap();
        if let Some(status) = queue.pop_front() {
            *last = Some(status.clone());
            status
        } else {
            last.clone()
                .unwrap_or_else(|| Self::status_fixture(OnboardingStep::EmailVerification))
        }
    }

    fn next_code_result(&self, code: &str) -> FlowResult<BackupCodes> {
        self.submitted_codes.lock().unwrap().push(code.to_string());
        self.code_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Self::backup_codes_fixture()))
    }
}

impl Default for MockOnboardingGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OnboardingGateway for MockOnboardingGateway {
    async fn register(&self, _request: RegisterRequest) -> FlowResult<OnboardingStatus> {
        Ok(self.next_status())
    }

    async fn start(&self) -> FlowResult<OnboardingStatus> {
        Ok(self.next_status())
    }

    async fn status(&self) -> FlowResult<OnboardingStatus> {
        Ok(self.next_status())
    }

    async fn verify_email(&self, otp: &str) -> FlowResult<OnboardingStatus> {
        self.submitted_codes.lock().unwrap().push(otp.to_string());
        self.verify_email_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Self::status_fixture(OnboardingStep::MfaSetup)))
    }

    async fn resend_email_otp(&self) -> FlowResult<ResendReceipt> {
        *self.resend_count.lock().unwrap() += 1;
        Ok(ResendReceipt {
            message: None,
            next_resend_secs: 60,
        })
    }

    async fn totp_initiate(&self) -> FlowResult<TotpEnrollment> {
        Ok(TotpEnrollment {
            secret: "JBSWY3DPEHPK3PXP".to_string(),
            otpauth_url: "otpauth://totp/veriflow:alice@example.com?secret=JBSWY3DPEHPK3PXP"
                .to_string(),
        })
    }

    async fn totp_verify(&self, code: &str) -> FlowResult<BackupCodes> {
        self.next_code_result(code)
    }

    async fn sms_send(&self, _phone: &str) -> FlowResult<SubjectId> {
        *self.resend_count.lock().unwrap() += 1;
        Ok(SubjectId::new("sms-session-1"))
    }

    async fn sms_verify(&self, _session_id: &SubjectId, code: &str) -> FlowResult<BackupCodes> {
        self.next_code_result(code)
    }

    async fn passkey_options(&self) -> FlowResult<CeremonyOptions> {
        Ok(CeremonyOptions {
            session_id: Some(SubjectId::new("reg-session-1")),
            public_key: serde_json::json!({"challenge": "bW9jaw", "rp": {"name": "veriflow"}}),
        })
    }

    async fn passkey_verify(
        &self,
        _session_id: &SubjectId,
        credential: SignedCredential,
    ) -> FlowResult<BackupCodes> {
        self.next_code_result(&credential.credential_id)
    }

    async fn skip_mfa(&self) -> FlowResult<OnboardingStatus> {
        Ok(self.next_status())
    }
}
