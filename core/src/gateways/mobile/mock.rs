//! Mock implementation of MobileVerificationGateway for testing

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::entities::verification_session::{VerificationSession, VerificationState};
use crate::errors::FlowResult;
use crate::gateways::types::{
    InitiateMobileVerification, MobileVerificationStatus, ResendReceipt,
};

use super::r#trait::MobileVerificationGateway;

/// Scripted mobile-verification gateway. Status polls serve queued states
/// and then repeat the last one, so tests can script pending → verified.
pub struct MockMobileVerificationGateway {
    states: Mutex<VecDeque<VerificationState>>,
    last_state: Mutex<VerificationState>,
    verify_results: Mutex<VecDeque<FlowResult<MobileVerificationStatus>>>,
    initiate_count: Mutex<u32>,
    submitted_codes: Mutex<Vec<String>>,
}

impl MockMobileVerificationGateway {
    pub fn new() -> Self {
        Self {
            states: Mutex::new(VecDeque::new()),
            last_state: Mutex::new(VerificationState::Pending),
            verify_results: Mutex::new(VecDeque::new()),
            initiate_count: Mutex::new(0),
            submitted_codes: Mutex::new(Vec::new()),
        }
    }

    pub fn session_fixture() -> VerificationSession {
        VerificationSession {
            verification_token: "vt-mock-1".to_string(),
            instructions: "Send the displayed code via WhatsApp".to_string(),
            whatsapp_number: Some("+14155550100".to_string()),
            expires_at: Utc::now() + Duration::minutes(10),
        }
    }

    pub fn push_state(&self, state: VerificationState) {
        self.states.lock().unwrap().push_back(state);
    }

    pub fn push_verify(&self, result: FlowResult<MobileVerificationStatus>) {
        self.verify_results.lock().unwrap().push_back(result);
    }

    pub fn initiate_count(&self) -> u32 {
        *self.initiate_count.lock().unwrap()
    }

    pub fn submitted_codes(&self) -> Vec<String> {
        self.submitted_codes.lock().unwrap().clone()
    }
}

impl Default for MockMobileVerificationGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MobileVerificationGateway for MockMobileVerificationGateway {
    async fn initiate(
        &self,
        _request: InitiateMobileVerification,
    ) -> FlowResult<VerificationSession> {
        *self.initiate_count.lock().unwrap() += 1;
        Ok(Self::session_fixture())
    }

    async fn resend(&self) -> FlowResult<ResendReceipt> {
        Ok(ResendReceipt {
            message: None,
            next_resend_secs: 60,
        })
    }

    async fn verify_otp(&self, code: &str) -> FlowResult<MobileVerificationStatus> {
        self.submitted_codes.lock().unwrap().push(code.to_string());
        self.verify_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(MobileVerificationStatus {
                state: VerificationState::Verified,
            }))
    }

    async fn status(&self) -> FlowResult<MobileVerificationStatus> {
        let mut queue = self.states.lock().unwrap();
        let mut last = self.last_state.lock().unwrap();
        if let Some(state) = queue.pop_front() {
            *last = state;
        }
        Ok(MobileVerificationStatus { state: *last })
    }
}
