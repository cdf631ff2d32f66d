//! Four-phase contact-change saga implementation.

use std::sync::Arc;
use tokio::time::Duration;
use tracing;

use crate::domain::entities::contact_change::{
    ContactChangePhase, ContactChangeState, ContactChannel,
};
use crate::errors::{FlowError, FlowResult, ValidationError};
use crate::gateways::contact::ContactChangeGateway;
use crate::services::otp::ResendTimer;
use vf_shared::utils::contact::{is_valid_email, is_valid_phone, mask_phone_number};

use super::config::ContactChangeConfig;

/// Drives one change of a verified contact point:
/// identity → new value → verify → success.
///
/// The `change_request_id` capability issued at the end of identity
/// verification gates every later call. Going back from `verify` lands on
/// `new_value`; going back from `new_value` lands on `identity` and
/// treats the prior identity OTP as consumed, so a fresh one must be
/// requested. The saga holds the revert token only in `success` and
/// self-disposes after a fixed display window.
pub struct ContactChangeSaga<G: ContactChangeGateway> {
    gateway: Arc<G>,
    channel: ContactChannel,
    config: ContactChangeConfig,
    state: ContactChangeState,
    timer: ResendTimer,
    in_flight: bool,
}

impl<G: ContactChangeGateway> ContactChangeSaga<G> {
    pub fn new(gateway: Arc<G>, channel: ContactChannel) -> Self {
        Self::with_config(gateway, channel, ContactChangeConfig::default())
    }

    pub fn with_config(
        gateway: Arc<G>,
        channel: ContactChannel,
        config: ContactChangeConfig,
    ) -> Self {
        let timer = ResendTimer::new(config.resend_cooldown_secs);
        Self {
            gateway,
            channel,
            config,
            state: ContactChangeState::new(),
            timer,
            in_flight: false,
        }
    }

    pub fn channel(&self) -> ContactChannel {
        self.channel
    }

    pub fn phase(&self) -> ContactChangePhase {
        self.state.phase
    }

    pub fn state(&self) -> &ContactChangeState {
        &self.state
    }

    /// Daily request count surfaced for display; never enforced here
    pub fn change_requests_today(&self) -> u32 {
        self.state.change_requests_today
    }

    pub fn daily_cap(&self) -> u32 {
        self.config.daily_cap
    }

    pub fn is_resend_available(&self) -> bool {
        self.timer.is_resend_available()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Inline step-local error text, if any
    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    /// Request an identity OTP to the current contact point. Entry point
    /// of the saga, and re-entered after `back()` from `new_value`.
    /// Returns the masked contact the code went to.
    pub async fn request_identity(&mut self) -> FlowResult<Option<String>> {
        if self.in_flight || self.state.phase != ContactChangePhase::Identity {
            return Ok(None);
        }
        self.in_flight = true;
        self.state.error = None;
        let result = self.gateway.request_identity_verification(self.channel).await;
        self.in_flight = false;

        match result {
            Ok(verification) => {
                self.state.identity_verification_id = Some(verification.verification_id);
                self.timer.start();
                tracing::info!(
                    channel = %self.channel,
                    event = "contact_change_identity_requested",
                    "Identity verification OTP requested"
                );
                Ok(verification.masked_contact)
            }
            Err(error) => self.absorb(error).map(|_| None),
        }
    }

    /// Answer the identity OTP. Success issues the change-request
    /// capability and moves to `new_value`.
    pub async fn verify_identity(&mut self, otp_code: &str) -> FlowResult<bool> {
        if self.in_flight || self.state.phase != ContactChangePhase::Identity {
            return Ok(false);
        }
        let Some(verification_id) = self.state.identity_verification_id.clone() else {
            self.state.error = Some("Request a verification code first".to_string());
            return Ok(false);
        };

        self.in_flight = true;
        self.state.error = None;
        let result = self
            .gateway
            .verify_identity(self.channel, &verification_id, otp_code)
            .await;
        self.in_flight = false;

        match result {
            Ok(authorization) => {
                self.state.change_request_id = Some(authorization.change_request_id);
                self.state.change_requests_today = authorization.change_requests_today;
                self.state.phase = ContactChangePhase::NewValue;
                tracing::info!(
                    channel = %self.channel,
                    event = "contact_change_identity_verified",
                    "Identity verified; change request opened"
                );
                Ok(true)
            }
            Err(error) => self.absorb(error).map(|_| false),
        }
    }

    /// Submit the replacement value. The server counts it against the
    /// daily quota and sends an OTP to the new contact point.
    ///
    /// The count is surfaced but never pre-enforced: even at the cap the
    /// submission goes out, and the server's quota rejection is what the
    /// caller displays.
    pub async fn submit_new_value(&mut self, new_value: &str) -> FlowResult<bool> {
        if self.in_flight || self.state.phase != ContactChangePhase::NewValue {
            return Ok(false);
        }
        if let Err(error) = self.validate_value(new_value) {
            self.state.error = Some(error.to_string());
            return Ok(false);
        }
        let Some(change_request_id) = self.state.change_request_id.clone() else {
            return Err(FlowError::Internal {
                message: "change request capability missing in new_value phase".to_string(),
            });
        };

        self.in_flight = true;
        self.state.error = None;
        let result = self
            .gateway
            .submit_new_value(self.channel, &change_request_id, new_value)
            .await;
        self.in_flight = false;

        match result {
            Ok(submission) => {
                self.state.change_verification_id = Some(submission.change_verification_id);
                self.state.change_requests_today = submission.change_requests_today;
                self.state.phase = ContactChangePhase::Verify;
                self.timer.start();
                tracing::info!(
                    channel = %self.channel,
                    requests_today = submission.change_requests_today,
                    event = "contact_change_submitted",
                    "New contact value submitted"
                );
                Ok(true)
            }
            Err(error) => self.absorb(error).map(|_| false),
        }
    }

    /// Answer the OTP sent to the new contact point. Success applies the
    /// change and yields the revert token.
    pub async fn verify_new_value(&mut self, otp_code: &str) -> FlowResult<Option<String>> {
        if self.in_flight || self.state.phase != ContactChangePhase::Verify {
            return Ok(None);
        }
        let (Some(change_request_id), Some(verification_id)) = (
            self.state.change_request_id.clone(),
            self.state.change_verification_id.clone(),
        ) else {
            return Err(FlowError::Internal {
                message: "saga ids missing in verify phase".to_string(),
            });
        };

        self.in_flight = true;
        self.state.error = None;
        let result = self
            .gateway
            .verify_new_value(self.channel, &change_request_id, &verification_id, otp_code)
            .await;
        self.in_flight = false;

        match result {
            Ok(completion) => {
                self.state.revert_token = Some(completion.revert_token.clone());
                self.state.phase = ContactChangePhase::Success;
                tracing::info!(
                    channel = %self.channel,
                    event = "contact_change_complete",
                    "Contact change applied; revert token issued"
                );
                Ok(Some(completion.revert_token))
            }
            Err(error) => self.absorb(error).map(|_| None),
        }
    }

    /// Resend the OTP for the active phase (identity or verify), gated by
    /// the cooldown timer. A `verify`-phase retry never re-runs identity.
    pub async fn resend(&mut self) -> FlowResult<bool> {
        if self.in_flight || !self.timer.is_resend_available() {
            return Ok(false);
        }
        let verification_id = match self.state.phase {
            ContactChangePhase::Identity => self.state.identity_verification_id.clone(),
            ContactChangePhase::Verify => self.state.change_verification_id.clone(),
            _ => None,
        };
        let Some(verification_id) = verification_id else {
            return Ok(false);
        };

        self.in_flight = true;
        let result = self.gateway.resend_otp(self.channel, &verification_id).await;
        self.in_flight = false;

        match result {
            Ok(receipt) => {
                self.timer.restart_with(match receipt.next_resend_secs {
                    0 => None,
                    secs => Some(secs),
                });
                Ok(true)
            }
            Err(error) => self.absorb(error).map(|_| false),
        }
    }

    /// Step back one phase.
    ///
    /// `verify` returns to `new_value`. `new_value` returns to `identity`
    /// and invalidates the prior identity OTP and capability: the caller
    /// must call [`request_identity`](Self::request_identity) again.
    /// `success` has no predecessor.
    pub fn back(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        let Some(previous) = self.state.previous_phase() else {
            return false;
        };
        self.state.error = None;
        match previous {
            ContactChangePhase::Identity => {
                // The prior identity OTP is treated as consumed
                self.state.identity_verification_id = None;
                self.state.change_request_id = None;
                self.state.change_verification_id = None;
                self.timer.clear();
            }
            ContactChangePhase::NewValue => {
                self.state.change_verification_id = None;
            }
            _ => {}
        }
        self.state.phase = previous;
        true
    }

    /// Undo an applied change with the single-use revert token
    pub async fn revert(&self, revert_token: &str) -> FlowResult<()> {
        self.gateway.revert(self.channel, revert_token).await
    }

    /// Hold the success screen for the configured window, then dispose.
    /// The revert token was already handed to the caller; the saga never
    /// retries or refreshes it.
    pub async fn self_dispose(self) {
        tokio::time::sleep(Duration::from_secs(self.config.success_display_secs)).await;
        tracing::debug!(
            channel = %self.channel,
            event = "contact_change_disposed",
            "Contact-change saga disposed after success display"
        );
    }

    fn validate_value(&self, value: &str) -> Result<(), ValidationError> {
        match self.channel {
            ContactChannel::Email if !is_valid_email(value) => Err(ValidationError::InvalidEmail),
            ContactChannel::Phone if !is_valid_phone(value) => {
                Err(ValidationError::InvalidPhoneFormat {
                    phone: mask_phone_number(value),
                })
            }
            _ => Ok(()),
        }
    }

    /// Absorb a step-local error into inline state; propagate fatal ones
    fn absorb(&mut self, error: FlowError) -> FlowResult<()> {
        if error.is_fatal() {
            return Err(error);
        }
        tracing::warn!(
            channel = %self.channel,
            phase = ?self.state.phase,
            error = %error,
            event = "contact_change_step_error",
            "Contact-change step rejected"
        );
        self.state.error = Some(error.user_message());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ChallengeError;
    use crate::gateways::contact::MockContactChangeGateway;

    async fn saga_at_verify(
        gateway: Arc<MockContactChangeGateway>,
    ) -> ContactChangeSaga<MockContactChangeGateway> {
        let mut saga = ContactChangeSaga::new(gateway, ContactChannel::Email);
        saga.request_identity().await.unwrap();
        assert!(saga.verify_identity("123456").await.unwrap());
        assert!(saga.submit_new_value("new@example.com").await.unwrap());
        assert_eq!(saga.phase(), ContactChangePhase::Verify);
        saga
    }

    #[tokio::test]
    async fn test_happy_path_reaches_success_with_revert_token() {
        let gateway = Arc::new(MockContactChangeGateway::new());
        let mut saga = saga_at_verify(gateway).await;

        let token = saga.verify_new_value("654321").await.unwrap();
        assert_eq!(token.as_deref(), Some("rvt-1"));
        assert_eq!(saga.phase(), ContactChangePhase::Success);
        assert_eq!(saga.state().revert_token.as_deref(), Some("rvt-1"));
    }

    #[tokio::test]
    async fn test_capability_gates_later_phases() {
        let gateway = Arc::new(MockContactChangeGateway::new());
        let mut saga = ContactChangeSaga::new(gateway, ContactChannel::Email);

        // Phase guards: nothing past identity may run yet
        assert!(!saga.submit_new_value("new@example.com").await.unwrap());
        assert!(saga.verify_new_value("123456").await.unwrap().is_none());

        // Identity OTP must be requested before it can be answered
        assert!(!saga.verify_identity("123456").await.unwrap());
        assert!(saga.error().is_some());
    }

    #[tokio::test]
    async fn test_back_from_verify_returns_to_new_value() {
        let gateway = Arc::new(MockContactChangeGateway::new());
        let mut saga = saga_at_verify(gateway).await;

        assert!(saga.back());
        assert_eq!(saga.phase(), ContactChangePhase::NewValue);
        // The capability survives; only the new-value OTP is dropped
        assert!(saga.state().change_request_id.is_some());
        assert!(saga.state().change_verification_id.is_none());
    }

    #[tokio::test]
    async fn test_back_from_new_value_requires_fresh_identity_otp() {
        let gateway = Arc::new(MockContactChangeGateway::new());
        let mut saga = ContactChangeSaga::new(gateway.clone(), ContactChannel::Email);
        saga.request_identity().await.unwrap();
        assert!(saga.verify_identity("123456").await.unwrap());

        assert!(saga.back());
        assert_eq!(saga.phase(), ContactChangePhase::Identity);
        assert!(saga.state().identity_verification_id.is_none());
        assert!(saga.state().change_request_id.is_none());

        // Re-entering identity requests a fresh OTP (new verification id)
        saga.request_identity().await.unwrap();
        assert_eq!(gateway.identity_request_count(), 2);
    }

    #[tokio::test]
    async fn test_no_back_sequence_reaches_success() {
        let gateway = Arc::new(MockContactChangeGateway::new());
        let mut saga = saga_at_verify(gateway).await;

        // Walk all the way back, then confirm success is unreachable
        // without passing verify again
        assert!(saga.back());
        assert!(saga.back());
        assert_eq!(saga.phase(), ContactChangePhase::Identity);
        assert!(!saga.back());
        assert_eq!(saga.phase(), ContactChangePhase::Identity);
        assert!(saga.state().revert_token.is_none());
    }

    #[tokio::test]
    async fn test_verify_retry_without_rerunning_identity() {
        let gateway = Arc::new(MockContactChangeGateway::new());
        gateway.push_verify_new(Err(ChallengeError::InvalidCode {
            remaining_attempts: Some(2),
        }
        .into()));
        let mut saga = saga_at_verify(gateway.clone()).await;

        // First attempt rejected; stays on verify with an inline error
        assert!(saga.verify_new_value("000000").await.unwrap().is_none());
        assert_eq!(saga.phase(), ContactChangePhase::Verify);
        assert!(saga.error().is_some());

        // Retry succeeds without another identity request
        let token = saga.verify_new_value("654321").await.unwrap();
        assert!(token.is_some());
        assert_eq!(gateway.identity_request_count(), 1);
    }

    #[tokio::test]
    async fn test_quota_rejection_is_surfaced_not_pre_enforced() {
        let gateway = Arc::new(MockContactChangeGateway::new());
        gateway.push_verify_identity(Ok(crate::gateways::types::ChangeAuthorization {
            change_request_id: vf_shared::types::SubjectId::new("chg-1"),
            change_requests_today: 3,
        }));
        gateway.push_submit(Err(ChallengeError::QuotaExceeded {
            requests_today: 3,
            daily_cap: 3,
        }
        .into()));

        let mut saga = ContactChangeSaga::new(gateway.clone(), ContactChannel::Email);
        saga.request_identity().await.unwrap();
        assert!(saga.verify_identity("123456").await.unwrap());

        // At the cap the form still submits; only the server says no
        assert_eq!(saga.change_requests_today(), 3);
        assert!(!saga.submit_new_value("new@example.com").await.unwrap());
        assert_eq!(gateway.submitted_values(), vec!["new@example.com"]);
        assert!(saga.error().unwrap().contains("3/3"));
        assert_eq!(saga.phase(), ContactChangePhase::NewValue);
    }

    #[tokio::test]
    async fn test_revert_token_single_use() {
        let gateway = Arc::new(MockContactChangeGateway::new());
        let mut saga = saga_at_verify(gateway).await;
        let token = saga.verify_new_value("654321").await.unwrap().unwrap();

        assert!(saga.revert(&token).await.is_ok());
        let second = saga.revert(&token).await;
        assert_eq!(
            second,
            Err(FlowError::Challenge(ChallengeError::RevertTokenInvalid))
        );
    }

    #[tokio::test]
    async fn test_invalid_new_value_never_hits_the_network() {
        let gateway = Arc::new(MockContactChangeGateway::new());
        let mut saga = ContactChangeSaga::new(gateway.clone(), ContactChannel::Email);
        saga.request_identity().await.unwrap();
        assert!(saga.verify_identity("123456").await.unwrap());

        assert!(!saga.submit_new_value("not-an-email").await.unwrap());
        assert!(gateway.submitted_values().is_empty());
        assert!(saga.error().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resend_cooldown_gates_verify_phase() {
        let gateway = Arc::new(MockContactChangeGateway::new());
        let mut saga = saga_at_verify(gateway.clone()).await;

        // Cooldown started when the new-value OTP was sent
        assert!(!saga.resend().await.unwrap());
        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(saga.resend().await.unwrap());
        assert_eq!(gateway.resend_count(), 1);
    }
}
