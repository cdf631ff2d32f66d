//! OTP challenge unit: drives a one-time-code input to completion.

use async_trait::async_trait;
use std::sync::Arc;
use tracing;

use crate::errors::{FlowError, FlowResult, ValidationError};
use crate::gateways::types::ResendReceipt;
use vf_shared::utils::validation::validators;

use super::config::{ClearPolicy, OtpConfig};
use super::resend_timer::ResendTimer;

/// Port through which a challenge unit submits and resends codes.
///
/// Each flow binds one of these to the concrete endpoint pair it talks
/// to; the unit itself never knows which contact point is being proven.
#[async_trait]
pub trait OtpSubmitter: Send + Sync {
    /// Whatever the server hands back on success (a status snapshot,
    /// backup codes, a reset token)
    type Artifact: Send;

    async fn submit(&self, code: &str) -> FlowResult<Self::Artifact>;

    async fn resend(&self) -> FlowResult<ResendReceipt>;
}

/// One-time-code challenge unit.
///
/// Auto-submits the instant the final digit is entered and exactly once
/// per completed code. While a submit is in flight, further entry and
/// auto-submits are suppressed. Step-local failures are absorbed into
/// [`error`](OtpChallenge::error) without touching the caller's
/// sub-progress; flow-fatal errors propagate.
pub struct OtpChallenge<S: OtpSubmitter> {
    submitter: Arc<S>,
    config: OtpConfig,
    code: String,
    in_flight: bool,
    error: Option<FlowError>,
    timer: ResendTimer,
}

impl<S: OtpSubmitter> OtpChallenge<S> {
    /// Create a unit for a code that was just dispatched; the resend
    /// cooldown starts immediately
    pub fn new(submitter: Arc<S>, config: OtpConfig) -> Self {
        let timer = ResendTimer::started(config.resend_cooldown_secs);
        Self {
            submitter,
            config,
            code: String::new(),
            in_flight: false,
            error: None,
            timer,
        }
    }

    /// Current input contents
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Inline error from the last rejected attempt, if any
    pub fn error(&self) -> Option<&FlowError> {
        self.error.as_ref()
    }

    /// Whether a submission is currently in flight
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether the resend action is currently allowed
    pub fn is_resend_available(&self) -> bool {
        self.timer.is_resend_available()
    }

    /// Whole seconds until resend unlocks
    pub fn resend_remaining_secs(&self) -> u64 {
        self.timer.remaining_secs()
    }

    /// Clear the input and any inline error
    pub fn clear(&mut self) {
        self.code.clear();
        self.error = None;
    }

    /// Enter one character.
    ///
    /// Non-digits are rejected at entry. The completing digit triggers
    /// exactly one submission; extra keystrokes on a full input are
    /// dropped, and everything is suppressed while a submit is in flight.
    pub async fn push_digit(&mut self, digit: char) -> FlowResult<Option<S::Artifact>> {
        if self.in_flight || !digit.is_ascii_digit() || self.code.len() >= self.config.code_length
        {
            return Ok(None);
        }
        self.code.push(digit);
        if self.code.len() == self.config.code_length {
            return self.dispatch().await;
        }
        Ok(None)
    }

    /// Enter several characters at once (paste path)
    pub async fn enter(&mut self, text: &str) -> FlowResult<Option<S::Artifact>> {
        for c in text.chars() {
            if let Some(artifact) = self.push_digit(c).await? {
                return Ok(Some(artifact));
            }
        }
        Ok(None)
    }

    /// Explicit submit path (accessibility / retry after a kept error).
    ///
    /// Validates the full code shape before any network call; a malformed
    /// code surfaces inline and nothing is sent.
    pub async fn submit(&mut self) -> FlowResult<Option<S::Artifact>> {
        if self.in_flight {
            return Ok(None);
        }
        if !validators::is_numeric_code(&self.code, self.config.code_length) {
            self.error = Some(
                ValidationError::InvalidCodeFormat {
                    expected: self.config.code_length,
                }
                .into(),
            );
            return Ok(None);
        }
        self.dispatch().await
    }

    /// Request a fresh code. Returns `Ok(false)` when the cooldown is
    /// still running or a step-local error was absorbed.
    pub async fn resend(&mut self) -> FlowResult<bool> {
        if !self.timer.is_resend_available() {
            tracing::debug!(
                remaining_secs = self.timer.remaining_secs(),
                event = "otp_resend_gated",
                "Resend requested during cooldown"
            );
            return Ok(false);
        }
        match self.submitter.resend().await {
            Ok(receipt) => {
                self.timer.restart_with(match receipt.next_resend_secs {
                    0 => None,
                    secs => Some(secs),
                });
                self.error = None;
                tracing::info!(event = "otp_resent", "Verification code resent");
                Ok(true)
            }
            Err(error) if error.is_fatal() => Err(error),
            Err(error) => {
                self.error = Some(error);
                Ok(false)
            }
        }
    }

    async fn dispatch(&mut self) -> FlowResult<Option<S::Artifact>> {
        self.in_flight = true;
        self.error = None;
        let result = self.submitter.submit(&self.code).await;
        self.in_flight = false;

        match result {
            Ok(artifact) => {
                tracing::info!(event = "otp_accepted", "Verification code accepted");
                Ok(Some(artifact))
            }
            Err(error) if error.is_fatal() => Err(error),
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    event = "otp_rejected",
                    "Verification code rejected"
                );
                if self.config.clear_policy == ClearPolicy::ClearOnError {
                    self.code.clear();
                }
                self.error = Some(error);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ChallengeError;
    use std::sync::Mutex;

    struct RecordingSubmitter {
        submissions: Mutex<Vec<String>>,
        results: Mutex<Vec<FlowResult<&'static str>>>,
    }

    impl RecordingSubmitter {
        fn accepting() -> Self {
            Self {
                submissions: Mutex::new(Vec::new()),
                results: Mutex::new(Vec::new()),
            }
        }

        fn with_results(results: Vec<FlowResult<&'static str>>) -> Self {
            Self {
                submissions: Mutex::new(Vec::new()),
                results: Mutex::new(results),
            }
        }

        fn submissions(&self) -> Vec<String> {
            self.submissions.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OtpSubmitter for RecordingSubmitter {
        type Artifact = &'static str;

        async fn submit(&self, code: &str) -> FlowResult<&'static str> {
            self.submissions.lock().unwrap().push(code.to_string());
            let mut results = self.results.lock().unwrap();
            if results.is_empty() {
                Ok("accepted")
            } else {
                results.remove(0)
            }
        }

        async fn resend(&self) -> FlowResult<ResendReceipt> {
            Ok(ResendReceipt {
                message: None,
                next_resend_secs: 60,
            })
        }
    }

    #[tokio::test]
    async fn test_auto_submit_fires_exactly_once() {
        let submitter = Arc::new(RecordingSubmitter::accepting());
        let mut unit = OtpChallenge::new(submitter.clone(), OtpConfig::default());

        let mut artifact = None;
        for digit in "123456".chars() {
            if let Some(a) = unit.push_digit(digit).await.unwrap() {
                artifact = Some(a);
            }
        }

        assert_eq!(artifact, Some("accepted"));
        assert_eq!(submitter.submissions(), vec!["123456"]);
    }

    #[tokio::test]
    async fn test_extra_keystrokes_on_full_input_are_dropped() {
        let submitter = Arc::new(RecordingSubmitter::with_results(vec![Err(
            ChallengeError::InvalidCode {
                remaining_attempts: Some(2),
            }
            .into(),
        )]));
        let mut unit = OtpChallenge::new(submitter.clone(), OtpConfig::enrollment());

        unit.enter("654321").await.unwrap();
        assert!(unit.error().is_some());
        // KeepOnError leaves the rejected code populated
        assert_eq!(unit.code(), "654321");

        // A seventh digit neither mutates the input nor re-submits
        unit.push_digit('9').await.unwrap();
        assert_eq!(unit.code(), "654321");
        assert_eq!(submitter.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_non_digits_rejected_at_entry() {
        let submitter = Arc::new(RecordingSubmitter::accepting());
        let mut unit = OtpChallenge::new(submitter.clone(), OtpConfig::default());

        unit.enter("12a3x45").await.unwrap().unwrap();
        assert_eq!(submitter.submissions(), vec!["123456"]);
    }

    #[tokio::test]
    async fn test_clear_on_error_policy_empties_input() {
        let submitter = Arc::new(RecordingSubmitter::with_results(vec![Err(
            ChallengeError::InvalidCode {
                remaining_attempts: Some(1),
            }
            .into(),
        )]));
        let mut unit = OtpChallenge::new(submitter, OtpConfig::identity());

        unit.enter("111111").await.unwrap();
        assert_eq!(unit.code(), "");
        assert!(unit.error().is_some());
    }

    #[tokio::test]
    async fn test_explicit_submit_validates_shape() {
        let submitter = Arc::new(RecordingSubmitter::accepting());
        let mut unit = OtpChallenge::new(submitter.clone(), OtpConfig::default());

        unit.enter("123").await.unwrap();
        let outcome = unit.submit().await.unwrap();
        assert!(outcome.is_none());
        assert!(matches!(
            unit.error(),
            Some(FlowError::Validation(ValidationError::InvalidCodeFormat { expected: 6 }))
        ));
        assert!(submitter.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_submit_retries_kept_code() {
        let submitter = Arc::new(RecordingSubmitter::with_results(vec![Err(
            ChallengeError::InvalidCode {
                remaining_attempts: Some(2),
            }
            .into(),
        )]));
        let mut unit = OtpChallenge::new(submitter.clone(), OtpConfig::enrollment());

        unit.enter("222222").await.unwrap();
        assert!(unit.error().is_some());

        let artifact = unit.submit().await.unwrap();
        assert_eq!(artifact, Some("accepted"));
        assert_eq!(submitter.submissions(), vec!["222222", "222222"]);
        assert!(unit.error().is_none());
    }

    #[tokio::test]
    async fn test_fatal_errors_propagate() {
        let submitter = Arc::new(RecordingSubmitter::with_results(vec![Err(
            FlowError::SessionExpired,
        )]));
        let mut unit = OtpChallenge::new(submitter, OtpConfig::default());

        let result = unit.enter("123456").await;
        assert_eq!(result, Err(FlowError::SessionExpired));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resend_gated_then_allowed() {
        let submitter = Arc::new(RecordingSubmitter::accepting());
        let mut unit = OtpChallenge::new(submitter, OtpConfig::default());

        assert!(!unit.resend().await.unwrap());

        tokio::time::advance(std::time::Duration::from_secs(60)).await;
        assert!(unit.resend().await.unwrap());

        // The cooldown restarted in full
        assert!(!unit.is_resend_available());
    }
}
