//! Mock implementation of AuthGateway for testing

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::value_objects::auth_session::{AuthSession, LoginOutcome};
use crate::errors::FlowResult;
use crate::gateways::types::{
    CeremonyOptions, LoginRequest, ResendReceipt, SignedCredential, SignupRequest,
};
use vf_shared::types::SubjectId;

use super::r#trait::AuthGateway;

/// Scripted auth gateway. Outcomes are queued per operation; when a queue
/// is empty the mock answers with a plain success fixture. Every
/// code-verification call is recorded for assertion.
pub struct MockAuthGateway {
    login_outcomes: Mutex<VecDeque<FlowResult<LoginOutcome>>>,
    verify_results: Mutex<VecDeque<FlowResult<AuthSession>>>,
    sms_receipts: Mutex<VecDeque<FlowResult<ResendReceipt>>>,
    option_results: Mutex<VecDeque<FlowResult<CeremonyOptions>>>,
    verify_calls: Mutex<Vec<(String, String)>>,
    sms_send_count: Mutex<u32>,
}

impl MockAuthGateway {
    pub fn new() -> Self {
        Self {
            login_outcomes: Mutex::new(VecDeque::new()),
            verify_results: Mutex::new(VecDeque::new()),
            sms_receipts: Mutex::new(VecDeque::new()),
            option_results: Mutex::new(VecDeque::new()),
            verify_calls: Mutex::new(Vec::new()),
            sms_send_count: Mutex::new(0),
        }
    }

    /// A plain session fixture
    pub fn session_fixture() -> AuthSession {
        AuthSession {
            access_token: "mock-access-token".to_string(),
            expires_in: 900,
            requires_onboarding: false,
            onboarding_step: None,
        }
    }

    pub fn push_login(&self, outcome: FlowResult<LoginOutcome>) {
        self.login_outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn push_verify(&self, result: FlowResult<AuthSession>) {
        self.verify_results.lock().unwrap().push_back(result);
    }

    pub fn push_options(&self, result: FlowResult<CeremonyOptions>) {
        self.option_results.lock().unwrap().push_back(result);
    }

    /// Codes submitted through any verification method, with the session
    /// id they were submitted against
    pub fn verify_calls(&self) -> Vec<(String, String)> {
        self.verify_calls.lock().unwrap().clone()
    }

    pub fn sms_send_count(&self) -> u32 {
        *self.sms_send_count.lock().unwrap()
    }

    fn record_verify(&self, session_id: &SubjectId, code: &str) {
        self.verify_calls
            .lock()
            .unwrap()
            .push((session_id.to_string(), code.to_string()));
    }

    fn next_verify(&self) -> FlowResult<AuthSession> {
        self.verify_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Self::session_fixture()))
    }
}

impl Default for MockAuthGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthGateway for MockAuthGateway {
    async fn signup(&self, _request: SignupRequest) -> FlowResult<LoginOutcome> {
        self.login_outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(LoginOutcome::Session(Self::session_fixture())))
    }

    async fn login(&self, _request: LoginRequest) -> FlowResult<LoginOutcome> {
        self.login_outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(LoginOutcome::Session(Self::session_fixture())))
    }

    async fn verify_totp(&self, session_id: &SubjectId, code: &str) -> FlowResult<AuthSession> {
        self.record_verify(session_id, code);
        self.next_verify()
    }

    async fn send_mfa_sms(&self, _session_id: &SubjectId) -> FlowResult<ResendReceipt> {
        *self.sms_send_count.lock().unwrap() += 1;
        self.sms_receipts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(ResendReceipt {
                    message: None,
                    next_resend_secs: 60,
                })
            })
    }

    async fn verify_mfa_sms(&self, session_id: &SubjectId, code: &str) -> FlowResult<AuthSession> {
        self.record_verify(session_id, code);
        self.next_verify()
    }

    async fn passkey_options(
        &self,
        session_id: Option<&SubjectId>,
    ) -> FlowResult<CeremonyOptions> {
        self.option_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(CeremonyOptions {
                    session_id: session_id.cloned(),
                    public_key: serde_json::json!({"challenge": "bW9jaw"}),
                })
            })
    }

    async fn verify_passkey(
        &self,
        session_id: Option<&SubjectId>,
        credential: SignedCredential,
    ) -> FlowResult<AuthSession> {
        let session = session_id.cloned().unwrap_or_else(|| SubjectId::new("-"));
        self.record_verify(&session, &credential.credential_id);
        self.next_verify()
    }
}
