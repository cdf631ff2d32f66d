//! Mock implementation of PasswordResetGateway for testing

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::errors::FlowResult;
use crate::gateways::types::{ResendReceipt, ResetSession};
use vf_shared::types::SubjectId;

use super::r#trait::PasswordResetGateway;

/// Scripted password-reset gateway
pub struct MockPasswordResetGateway {
    verify_results: Mutex<VecDeque<FlowResult<String>>>,
    submitted_codes: Mutex<Vec<String>>,
    completed: Mutex<Vec<(String, String)>>,
    resend_count: Mutex<u32>,
}

impl MockPasswordResetGateway {
    pub fn new() -> Self {
        Self {
            verify_results: Mutex::new(VecDeque::new()),
            submitted_codes: Mutex::new(Vec::new()),
            completed: Mutex::new(Vec::new()),
            resend_count: Mutex::new(0),
        }
    }

    pub fn push_verify(&self, result: FlowResult<String>) {
        self.verify_results.lock().unwrap().push_back(result);
    }

    pub fn submitted_codes(&self) -> Vec<String> {
        self.submitted_codes.lock().unwrap().clone()
    }

    pub fn completions(&self) -> Vec<(String, String)> {
        self.completed.lock().unwrap().clone()
    }

    pub fn resend_count(&self) -> u32 {
        *self.resend_count.lock().unwrap()
    }
}

impl Default for MockPasswordResetGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordResetGateway for MockPasswordResetGateway {
    async fn request(&self, email: &str) -> FlowResult<ResetSession> {
        Ok(ResetSession {
            reset_session_id: SubjectId::new("reset-1"),
            masked_email: Some(vf_shared::utils::contact::mask_email(email)),
        })
    }

    async fn verify_otp(&self, _session_id: &SubjectId, code: &str) -> FlowResult<String> {
        self.submitted_codes.lock().unwrap().push(code.to_string());
        self.verify_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("reset-token-1".to_string()))
    }

    async fn resend_otp(&self, _session_id: &SubjectId) -> FlowResult<ResendReceipt> {
        *self.resend_count.lock().unwrap() += 1;
        Ok(ResendReceipt {
            message: None,
            next_resend_secs: 60,
        })
    }

    async fn complete(&self, reset_token: &str, new_password: &str) -> FlowResult<()> {
        self.completed
            .lock()
            .unwrap()
            .push((reset_token.to_string(), new_password.to_string()));
        Ok(())
    }
}
