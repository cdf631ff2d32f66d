//! Mock implementation of ContactChangeGateway for testing

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use crate::domain::entities::contact_change::ContactChannel;
use crate::errors::{ChallengeError, FlowResult};
use crate::gateways::types::{
    ChangeAuthorization, ChangeCompletion, ChangeSubmission, IdentityVerification, ResendReceipt,
};
use vf_shared::types::SubjectId;

use super::r#trait::ContactChangeGateway;

/// Scripted contact-change gateway.
///
/// Besides per-operation queues it models two server behaviors the saga
/// tests depend on: identity verification ids are fresh on every request,
/// and revert tokens are single-use.
pub struct MockContactChangeGateway {
    verify_identity_results: Mutex<VecDeque<FlowResult<ChangeAuthorization>>>,
    submit_results: Mutex<VecDeque<FlowResult<ChangeSubmission>>>,
    verify_new_results: Mutex<VecDeque<FlowResult<ChangeCompletion>>>,
    identity_request_count: Mutex<u32>,
    resend_count: Mutex<u32>,
    issued_revert_tokens: Mutex<HashSet<String>>,
    used_revert_tokens: Mutex<HashSet<String>>,
    submitted_values: Mutex<Vec<String>>,
}

impl MockContactChangeGateway {
    pub fn new() -> Self {
        Self {
            verify_identity_results: Mutex::new(VecDeque::new()),
            submit_results: Mutex::new(VecDeque::new()),
            verify_new_results: Mutex::new(VecDeque::new()),
            identity_request_count: Mutex::new(0),
            resend_count: Mutex::new(0),
            issued_revert_tokens: Mutex::new(HashSet::new()),
            used_revert_tokens: Mutex::new(HashSet::new()),
            submitted_values: Mutex::new(Vec::new()),
        }
    }

    pub fn push_verify_identity(&self, result: FlowResult<ChangeAuthorization>) {
        self.verify_identity_results.lock().unwrap().push_back(result);
    }

    pub fn push_submit(&self, result: FlowResult<ChangeSubmission>) {
        self.submit_results.lock().unwrap().push_back(result);
    }

    pub fn push_verify_new(&self, result: FlowResult<ChangeCompletion>) {
        self.verify_new_results.lock().unwrap().push_back(result);
    }

    /// Number of identity OTPs requested so far; each request issues a
    /// fresh verification id
    pub fn identity_request_count(&self) -> u32 {
        *self.identity_request_count.lock().unwrap()
    }

    pub fn resend_count(&self) -> u32 {
        *self.resend_count.lock().unwrap()
    }

    pub fn submitted_values(&self) -> Vec<String> {
        self.submitted_values.lock().unwrap().clone()
    }
}

impl Default for MockContactChangeGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactChangeGateway for MockContactChangeGateway {
    async fn request_identity_verification(
        &self,
        channel: ContactChannel,
    ) -> FlowResult<IdentityVerification> {
        let mut count = self.identity_request_count.lock().unwrap();
        *count += 1;
        Ok(IdentityVerification {
            verification_id: SubjectId::new(format!("idv-{}", *count)),
            masked_contact: Some(match channel {
                ContactChannel::Email => "al***@example.com".to_string(),
                ContactChannel::Phone => "+61****5678".to_string(),
            }),
        })
    }

    async fn verify_identity(
        &self,
        _channel: ContactChannel,
        _verification_id: &SubjectId,
        _otp_code: &str,
    ) -> FlowResult<ChangeAuthorization> {
        self.verify_identity_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(ChangeAuthorization {
                    change_request_id: SubjectId::new("chg-1"),
                    change_requests_today: 1,
                })
            })
    }

    async fn submit_new_value(
        &self,
        _channel: ContactChannel,
        _change_request_id: &SubjectId,
        new_value: &str,
    ) -> FlowResult<ChangeSubmission> {
        self.submitted_values
            .lock()
            .unwrap()
            .push(new_value.to_string());
        self.submit_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(ChangeSubmission {
                    change_verification_id: SubjectId::new("chv-1"),
                    change_requests_today: 1,
                })
            })
    }

    async fn verify_new_value(
        &self,
        _channel: ContactChannel,
        _change_request_id: &SubjectId,
        _verification_id: &SubjectId,
        _otp_code: &str,
    ) -> FlowResult<ChangeCompletion> {
        let result = self
            .verify_new_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(ChangeCompletion {
                    revert_token: "rvt-1".to_string(),
                })
            });
        if let Ok(completion) = &result {
            self.issued_revert_tokens
                .lock()
                .unwrap()
                .insert(completion.revert_token.clone());
        }
        result
    }

    async fn resend_otp(
        &self,
        _channel: ContactChannel,
        _verification_id: &SubjectId,
    ) -> FlowResult<ResendReceipt> {
        *self.resend_count.lock().unwrap() += 1;
        Ok(ResendReceipt {
            message: None,
            next_resend_secs: 60,
        })
    }

    async fn revert(&self, _channel: ContactChannel, revert_token: &str) -> FlowResult<()> {
        let issued = self.issued_revert_tokens.lock().unwrap();
        let mut used = self.used_revert_tokens.lock().unwrap();
        if !issued.contains(revert_token) || !used.insert(revert_token.to_string()) {
            return Err(ChallengeError::RevertTokenInvalid.into());
        }
        Ok(())
    }
}
