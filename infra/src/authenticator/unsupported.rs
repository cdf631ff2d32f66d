//! Fallback authenticator for hosts without credential support.

use async_trait::async_trait;

use vf_core::gateways::types::{CeremonyOptions, SignedCredential};
use vf_core::services::webauthn::{
    AuthenticatorError, AuthenticatorErrorKind, PlatformAuthenticator,
};

/// Always reports the capability as missing, so ceremony callers surface
/// "pick another method" instead of crashing on hosts without platform
/// credentials.
pub struct UnsupportedAuthenticator;

#[async_trait]
impl PlatformAuthenticator for UnsupportedAuthenticator {
    async fn create_credential(
        &self,
        _options: &CeremonyOptions,
    ) -> Result<SignedCredential, AuthenticatorError> {
        Err(AuthenticatorError::new(AuthenticatorErrorKind::NotSupported))
    }

    async fn get_assertion(
        &self,
        _options: &CeremonyOptions,
    ) -> Result<SignedCredential, AuthenticatorError> {
        Err(AuthenticatorError::new(AuthenticatorErrorKind::NotSupported))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_not_supported() {
        let options = CeremonyOptions {
            session_id: None,
            public_key: serde_json::json!({}),
        };
        let error = UnsupportedAuthenticator
            .create_credential(&options)
            .await
            .unwrap_err();
        assert_eq!(error.kind, AuthenticatorErrorKind::NotSupported);
    }
}
