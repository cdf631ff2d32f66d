//! Ceremony adapter: the three-phase passkey handshake.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use tracing;

use crate::errors::{CeremonyError, FlowResult};
use crate::gateways::types::{CeremonyOptions, SignedCredential};

use super::traits::{AuthenticatorError, AuthenticatorErrorKind, PlatformAuthenticator};
use super::types::{CeremonyKind, CeremonyPhase};

/// Server side of one ceremony: where options come from and where the
/// signed result goes. Flows bind this to the concrete endpoint pair
/// (login MFA, onboarding enrollment) and to any session id it carries.
#[async_trait]
pub trait CeremonyGateway: Send + Sync {
    /// The ceremony's success artifact (a login session, an enrollment
    /// completion payload)
    type Artifact: Send;

    async fn request_options(&self) -> FlowResult<CeremonyOptions>;

    async fn verify(&self, credential: SignedCredential) -> FlowResult<Self::Artifact>;
}

/// Map a platform discriminator to a user-facing ceremony error.
///
/// Only the discriminator is inspected; free-text details stay in logs.
fn map_authenticator_error(error: &AuthenticatorError) -> CeremonyError {
    match error.kind {
        AuthenticatorErrorKind::NotAllowed => CeremonyError::Cancelled,
        AuthenticatorErrorKind::NotSupported => CeremonyError::Unsupported,
        AuthenticatorErrorKind::Security => CeremonyError::InsecureContext,
        AuthenticatorErrorKind::InvalidState => CeremonyError::CredentialExists,
        AuthenticatorErrorKind::Abort => CeremonyError::Aborted,
        AuthenticatorErrorKind::Unknown => CeremonyError::Unknown,
    }
}

/// Runs one passkey ceremony to completion.
///
/// The phase is published through a watch channel so the caller can
/// render progress and knows when cancellation is still possible
/// (only during [`CeremonyPhase::AwaitingUser`]).
pub struct CeremonyAdapter<G: CeremonyGateway, A: PlatformAuthenticator> {
    gateway: Arc<G>,
    authenticator: Arc<A>,
    kind: CeremonyKind,
    phase_tx: watch::Sender<CeremonyPhase>,
}

impl<G: CeremonyGateway, A: PlatformAuthenticator> CeremonyAdapter<G, A> {
    /// Adapter for a credential-enrollment ceremony
    pub fn registration(gateway: Arc<G>, authenticator: Arc<A>) -> Self {
        Self::new(gateway, authenticator, CeremonyKind::Registration)
    }

    /// Adapter for an assertion ceremony
    pub fn authentication(gateway: Arc<G>, authenticator: Arc<A>) -> Self {
        Self::new(gateway, authenticator, CeremonyKind::Authentication)
    }

    fn new(gateway: Arc<G>, authenticator: Arc<A>, kind: CeremonyKind) -> Self {
        let (phase_tx, _) = watch::channel(CeremonyPhase::Idle);
        Self {
            gateway,
            authenticator,
            kind,
            phase_tx,
        }
    }

    /// Subscribe to phase transitions
    pub fn phase(&self) -> watch::Receiver<CeremonyPhase> {
        self.phase_tx.subscribe()
    }

    /// Current phase snapshot
    pub fn current_phase(&self) -> CeremonyPhase {
        *self.phase_tx.borrow()
    }

    fn set_phase(&self, phase: CeremonyPhase) {
        // send_replace updates the value even with no subscribers
        self.phase_tx.send_replace(phase);
    }

    /// Run the full handshake: request options, invoke the platform
    /// prompt, submit the signed result.
    ///
    /// Suspends indefinitely during `AwaitingUser`; the platform owns
    /// cancellation. On any failure the phase returns to `Idle`.
    pub async fn run(&self) -> FlowResult<G::Artifact> {
        self.set_phase(CeremonyPhase::Requested);
        let options = match self.gateway.request_options().await {
            Ok(options) => options,
            Err(error) => {
                self.set_phase(CeremonyPhase::Idle);
                return Err(error);
            }
        };

        self.set_phase(CeremonyPhase::AwaitingUser);
        let invoked = match self.kind {
            CeremonyKind::Registration => self.authenticator.create_credential(&options).await,
            CeremonyKind::Authentication => self.authenticator.get_assertion(&options).await,
        };
        let credential = match invoked {
            Ok(credential) => credential,
            Err(error) => {
                let mapped = map_authenticator_error(&error);
                tracing::warn!(
                    kind = ?error.kind,
                    detail = error.detail.as_deref().unwrap_or(""),
                    event = "ceremony_authenticator_failed",
                    "Platform authenticator reported an error"
                );
                self.set_phase(CeremonyPhase::Idle);
                return Err(mapped.into());
            }
        };

        self.set_phase(CeremonyPhase::Verifying);
        match self.gateway.verify(credential).await {
            Ok(artifact) => {
                self.set_phase(CeremonyPhase::Complete);
                tracing::info!(
                    kind = ?self.kind,
                    event = "ceremony_complete",
                    "Passkey ceremony verified"
                );
                Ok(artifact)
            }
            Err(error) => {
                self.set_phase(CeremonyPhase::Idle);
                Err(error)
            }
        }
    }
}
