//! Platform authenticator port and its error discriminators.

use async_trait::async_trait;
use std::fmt;

use crate::gateways::types::{CeremonyOptions, SignedCredential};

/// Stable discriminator for platform credential failures.
///
/// Mirrors the platform's exception taxonomy without its free text;
/// mapping to user-facing errors inspects only this value, so message
/// changes across platform versions cannot break the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticatorErrorKind {
    /// The user dismissed or declined the prompt
    NotAllowed,
    /// The device or browser lacks the capability
    NotSupported,
    /// The surrounding context is not secure
    Security,
    /// A matching credential already exists on this authenticator
    InvalidState,
    /// The operation was programmatically aborted
    Abort,
    /// Anything else
    Unknown,
}

/// Error surfaced by a platform authenticator invocation
#[derive(Debug, Clone)]
pub struct AuthenticatorError {
    pub kind: AuthenticatorErrorKind,
    /// Raw platform detail, kept for logs only; never shown to the user
    pub detail: Option<String>,
}

impl AuthenticatorError {
    pub fn new(kind: AuthenticatorErrorKind) -> Self {
        Self { kind, detail: None }
    }

    pub fn with_detail(kind: AuthenticatorErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: Some(detail.into()),
        }
    }
}

impl fmt::Display for AuthenticatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "authenticator error: {:?}", self.kind)
    }
}

impl std::error::Error for AuthenticatorError {}

/// Port to the platform's secure-credential machinery.
///
/// Both methods suspend indefinitely while the platform prompt is up;
/// there is no client-side timeout. Implementations live outside this
/// crate (the embedding host) or in infrastructure (mock, unsupported).
#[async_trait]
pub trait PlatformAuthenticator: Send + Sync {
    /// Run a credential-creation prompt (registration ceremony)
    async fn create_credential(
        &self,
        options: &CeremonyOptions,
    ) -> Result<SignedCredential, AuthenticatorError>;

    /// Run an assertion prompt (authentication ceremony)
    async fn get_assertion(
        &self,
        options: &CeremonyOptions,
    ) -> Result<SignedCredential, AuthenticatorError>;
}
