//! Password reset flow: request, prove control of the email, set the new
//! password.

use async_trait::async_trait;
use std::sync::Arc;
use tracing;

use crate::errors::{FlowError, FlowResult, ValidationError};
use crate::gateways::reset::PasswordResetGateway;
use crate::gateways::types::{ResendReceipt, ResetSession};
use crate::services::otp::{OtpChallenge, OtpConfig, OtpSubmitter};
use vf_shared::types::SubjectId;
use vf_shared::utils::contact::is_valid_email;

/// Minimum accepted password length
const MIN_PASSWORD_LENGTH: usize = 8;

/// Binds the OTP unit to the reset-session endpoints
struct ResetOtpSubmitter<G: PasswordResetGateway> {
    gateway: Arc<G>,
    session_id: SubjectId,
}

#[async_trait]
impl<G: PasswordResetGateway> OtpSubmitter for ResetOtpSubmitter<G> {
    type Artifact = String;

    async fn submit(&self, code: &str) -> FlowResult<String> {
        self.gateway.verify_otp(&self.session_id, code).await
    }

    async fn resend(&self) -> FlowResult<ResendReceipt> {
        self.gateway.resend_otp(&self.session_id).await
    }
}

/// Stage of the reset flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStage {
    /// Collect the account email
    Request,
    /// Answer the OTP sent to it
    Challenge,
    /// Choose the replacement password
    SetPassword,
    Complete,
}

/// Drives a password reset to completion.
///
/// The OTP success artifact is the single-use reset token; it is consumed
/// by [`complete`](Self::complete) and never retried.
pub struct PasswordResetFlow<G: PasswordResetGateway> {
    gateway: Arc<G>,
    stage: ResetStage,
    session: Option<ResetSession>,
    unit: Option<OtpChallenge<ResetOtpSubmitter<G>>>,
    reset_token: Option<String>,
    error: Option<FlowError>,
}

impl<G: PasswordResetGateway> PasswordResetFlow<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            stage: ResetStage::Request,
            session: None,
            unit: None,
            reset_token: None,
            error: None,
        }
    }

    pub fn stage(&self) -> ResetStage {
        self.stage
    }

    /// Masked rendering of the email the code went to
    pub fn masked_email(&self) -> Option<&str> {
        self.session
            .as_ref()
            .and_then(|session| session.masked_email.as_deref())
    }

    pub fn error(&self) -> Option<&FlowError> {
        self.error
            .as_ref()
            .or_else(|| self.unit.as_ref().and_then(|unit| unit.error()))
    }

    /// Open a reset session for this email
    pub async fn request(&mut self, email: &str) -> FlowResult<bool> {
        if self.stage != ResetStage::Request {
            return Ok(false);
        }
        if !is_valid_email(email) {
            self.error = Some(ValidationError::InvalidEmail.into());
            return Ok(false);
        }
        let session = self.gateway.request(email).await?;
        self.unit = Some(OtpChallenge::new(
            Arc::new(ResetOtpSubmitter {
                gateway: Arc::clone(&self.gateway),
                session_id: session.reset_session_id.clone(),
            }),
            // Reset-style challenge: a rejected code clears the input
            OtpConfig::identity(),
        ));
        self.session = Some(session);
        self.stage = ResetStage::Challenge;
        self.error = None;
        tracing::info!(event = "password_reset_requested", "Reset session opened");
        Ok(true)
    }

    /// Enter one code digit; the completing digit submits and, on
    /// success, yields the reset token internally
    pub async fn push_digit(&mut self, digit: char) -> FlowResult<bool> {
        if self.stage != ResetStage::Challenge {
            return Ok(false);
        }
        let Some(unit) = self.unit.as_mut() else {
            return Ok(false);
        };
        match unit.push_digit(digit).await? {
            Some(token) => {
                self.adopt_token(token);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Explicit submit path
    pub async fn submit(&mut self) -> FlowResult<bool> {
        if self.stage != ResetStage::Challenge {
            return Ok(false);
        }
        let Some(unit) = self.unit.as_mut() else {
            return Ok(false);
        };
        match unit.submit().await? {
            Some(token) => {
                self.adopt_token(token);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Resend the reset code, gated by the cooldown
    pub async fn resend(&mut self) -> FlowResult<bool> {
        match self.unit.as_mut() {
            Some(unit) => unit.resend().await,
            None => Ok(false),
        }
    }

    /// Set the replacement password, consuming the reset token
    pub async fn complete(&mut self, new_password: &str) -> FlowResult<bool> {
        if self.stage != ResetStage::SetPassword {
            return Ok(false);
        }
        if new_password.len() < MIN_PASSWORD_LENGTH {
            self.error = Some(
                ValidationError::InvalidFormat {
                    field: "password".to_string(),
                }
                .into(),
            );
            return Ok(false);
        }
        let Some(token) = self.reset_token.take() else {
            return Err(FlowError::Internal {
                message: "reset token missing in set_password stage".to_string(),
            });
        };
        match self.gateway.complete(&token, new_password).await {
            Ok(()) => {
                self.stage = ResetStage::Complete;
                self.unit = None;
                tracing::info!(event = "password_reset_complete", "Password reset");
                Ok(true)
            }
            Err(error) if error.is_fatal() => Err(error),
            Err(error) => {
                // The token went out with the failed call; the flow must
                // restart rather than retry a possibly-consumed token
                self.error = Some(error);
                self.stage = ResetStage::Request;
                self.session = None;
                Ok(false)
            }
        }
    }

    fn adopt_token(&mut self, token: String) {
        self.reset_token = Some(token);
        self.stage = ResetStage::SetPassword;
        self.error = None;
        self.unit = None;
        tracing::info!(
            event = "password_reset_code_accepted",
            "Reset code accepted; token issued"
        );
    }
}
