//! MFA login flow: consume a challenge issued by a login attempt.

use async_trait::async_trait;
use std::sync::Arc;
use tracing;

use crate::domain::entities::mfa_challenge::{MfaChallenge, MfaMethod};
use crate::domain::value_objects::auth_session::AuthSession;
use crate::errors::{ChallengeError, FlowError, FlowResult};
use crate::gateways::auth::AuthGateway;
use crate::gateways::types::{CeremonyOptions, ResendReceipt, SignedCredential};
use crate::services::otp::{OtpChallenge, OtpConfig, OtpSubmitter};
use crate::services::webauthn::{CeremonyAdapter, CeremonyGateway, PlatformAuthenticator};
use vf_shared::types::SubjectId;

/// Binds the OTP unit to the challenge's code-verification endpoints
struct ChallengeSubmitter<G: AuthGateway> {
    gateway: Arc<G>,
    session_id: SubjectId,
    method: MfaMethod,
}

#[async_trait]
impl<G: AuthGateway> OtpSubmitter for ChallengeSubmitter<G> {
    type Artifact = AuthSession;

    async fn submit(&self, code: &str) -> FlowResult<AuthSession> {
        match self.method {
            MfaMethod::Totp => self.gateway.verify_totp(&self.session_id, code).await,
            MfaMethod::Sms => self.gateway.verify_mfa_sms(&self.session_id, code).await,
            MfaMethod::Passkey => Err(FlowError::Internal {
                message: "passkey method has no code path".to_string(),
            }),
        }
    }

    async fn resend(&self) -> FlowResult<ResendReceipt> {
        match self.method {
            MfaMethod::Sms => self.gateway.send_mfa_sms(&self.session_id).await,
            // Authenticator-app codes regenerate on their own; resend is a
            // no-op that leaves the cooldown untouched
            _ => Ok(ResendReceipt {
                message: None,
                next_resend_secs: 0,
            }),
        }
    }
}

/// Binds the passkey ceremony to the challenge's assertion endpoints
struct ChallengeCeremonyGateway<G: AuthGateway> {
    gateway: Arc<G>,
    session_id: SubjectId,
}

#[async_trait]
impl<G: AuthGateway> CeremonyGateway for ChallengeCeremonyGateway<G> {
    type Artifact = AuthSession;

    async fn request_options(&self) -> FlowResult<CeremonyOptions> {
        self.gateway.passkey_options(Some(&self.session_id)).await
    }

    async fn verify(&self, credential: SignedCredential) -> FlowResult<AuthSession> {
        self.gateway
            .verify_passkey(Some(&self.session_id), credential)
            .await
    }
}

/// Drives one [`MfaChallenge`] to a session.
///
/// Renders the server's default method first with a switcher offering
/// only the remaining available methods. The challenge is consumed
/// exactly once; after success every further attempt is refused locally,
/// and a server rejection of the session id is treated as the expiry
/// signal (there is no local expiry clock).
pub struct MfaLoginFlow<G: AuthGateway, A: PlatformAuthenticator> {
    gateway: Arc<G>,
    authenticator: Arc<A>,
    challenge: MfaChallenge,
    selected: MfaMethod,
    unit: OtpChallenge<ChallengeSubmitter<G>>,
    consumed: bool,
    error: Option<FlowError>,
}

impl<G: AuthGateway, A: PlatformAuthenticator> MfaLoginFlow<G, A> {
    /// Create the flow positioned on the challenge's initial method
    pub fn new(
        gateway: Arc<G>,
        authenticator: Arc<A>,
        challenge: MfaChallenge,
    ) -> FlowResult<Self> {
        let selected = challenge
            .initial_method()
            .ok_or_else(|| FlowError::Internal {
                message: "challenge offers no methods".to_string(),
            })?;
        let unit = Self::build_unit(&gateway, &challenge.session_id, selected);
        Ok(Self {
            gateway,
            authenticator,
            challenge,
            selected,
            unit,
            consumed: false,
            error: None,
        })
    }

    fn build_unit(
        gateway: &Arc<G>,
        session_id: &SubjectId,
        method: MfaMethod,
    ) -> OtpChallenge<ChallengeSubmitter<G>> {
        OtpChallenge::new(
            Arc::new(ChallengeSubmitter {
                gateway: Arc::clone(gateway),
                session_id: session_id.clone(),
                method,
            }),
            // Identity-proof style: a rejected code clears the input
            OtpConfig::identity(),
        )
    }

    pub fn selected_method(&self) -> MfaMethod {
        self.selected
    }

    /// Methods offered by the switcher (everything available except the
    /// selected one)
    pub fn switch_methods(&self) -> Vec<MfaMethod> {
        self.challenge.switch_methods(self.selected)
    }

    pub fn masked_phone(&self) -> Option<&str> {
        self.challenge.masked_phone.as_deref()
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Inline error from the last attempt, if any
    pub fn error(&self) -> Option<&FlowError> {
        self.error.as_ref().or_else(|| self.unit.error())
    }

    /// Switch to another offered method; rebuilds the code input
    pub fn select_method(&mut self, method: MfaMethod) -> bool {
        if !self.challenge.supports(method) || self.consumed {
            return false;
        }
        self.selected = method;
        self.unit = Self::build_unit(&self.gateway, &self.challenge.session_id, method);
        self.error = None;
        true
    }

    /// Ask the server to deliver the SMS code for this challenge
    pub async fn send_sms(&mut self) -> FlowResult<ResendReceipt> {
        self.gateway.send_mfa_sms(&self.challenge.session_id).await
    }

    /// Enter one code digit; the completing digit submits
    pub async fn push_digit(&mut self, digit: char) -> FlowResult<Option<AuthSession>> {
        if self.consumed {
            return Ok(None);
        }
        let outcome = self.unit.push_digit(digit).await;
        self.finish(outcome)
    }

    /// Explicit submit path
    pub async fn submit(&mut self) -> FlowResult<Option<AuthSession>> {
        if self.consumed {
            return Ok(None);
        }
        let outcome = self.unit.submit().await;
        self.finish(outcome)
    }

    /// Resend the SMS code, gated by the cooldown
    pub async fn resend(&mut self) -> FlowResult<bool> {
        if self.consumed {
            return Ok(false);
        }
        self.unit.resend().await
    }

    /// Run the passkey assertion ceremony for this challenge.
    ///
    /// Step-local ceremony failures (cancelled, unsupported) are absorbed
    /// into [`error`](Self::error); flow-fatal errors propagate.
    pub async fn authenticate_passkey(&mut self) -> FlowResult<Option<AuthSession>> {
        if self.consumed || !self.challenge.supports(MfaMethod::Passkey) {
            return Ok(None);
        }
        let adapter = CeremonyAdapter::authentication(
            Arc::new(ChallengeCeremonyGateway {
                gateway: Arc::clone(&self.gateway),
                session_id: self.challenge.session_id.clone(),
            }),
            Arc::clone(&self.authenticator),
        );
        match adapter.run().await {
            Ok(session) => {
                self.consumed = true;
                self.error = None;
                tracing::info!(
                    method = %MfaMethod::Passkey,
                    event = "mfa_challenge_consumed",
                    "MFA challenge answered with a passkey"
                );
                Ok(Some(session))
            }
            Err(error) if error.is_fatal() => Err(error),
            Err(error) => {
                self.error = Some(error);
                Ok(None)
            }
        }
    }

    fn finish(
        &mut self,
        outcome: FlowResult<Option<AuthSession>>,
    ) -> FlowResult<Option<AuthSession>> {
        match outcome {
            Ok(Some(session)) => {
                self.consumed = true;
                tracing::info!(
                    method = %self.selected,
                    event = "mfa_challenge_consumed",
                    "MFA challenge answered with a code"
                );
                Ok(Some(session))
            }
            other => other,
        }
    }
}

/// Interpret a server rejection of the challenge session as expiry
pub fn challenge_expired(error: &FlowError) -> bool {
    matches!(
        error,
        FlowError::Challenge(ChallengeError::ChallengeExpired)
    )
}
