//! Mock platform authenticator for development and testing.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::sync::Mutex;
use tracing;

use vf_core::gateways::types::{CeremonyOptions, SignedCredential};
use vf_core::services::webauthn::{
    AuthenticatorError, AuthenticatorErrorKind, PlatformAuthenticator,
};

/// Scripted authenticator: approves every prompt by default, or fails
/// with a queued discriminator. Useful for driving ceremonies in
/// development builds and tests without platform credential machinery.
pub struct MockAuthenticator {
    failures: Mutex<Vec<AuthenticatorErrorKind>>,
    prompt_count: Mutex<u32>,
}

impl MockAuthenticator {
    /// Approves every prompt
    pub fn approving() -> Self {
        Self {
            failures: Mutex::new(Vec::new()),
            prompt_count: Mutex::new(0),
        }
    }

    /// Fails the next prompts with the given discriminators, then
    /// approves
    pub fn failing_with(failures: Vec<AuthenticatorErrorKind>) -> Self {
        Self {
            failures: Mutex::new(failures),
            prompt_count: Mutex::new(0),
        }
    }

    /// Number of prompts this authenticator has shown
    pub fn prompt_count(&self) -> u32 {
        *self.prompt_count.lock().unwrap()
    }

    fn respond(&self, ceremony: &str) -> Result<SignedCredential, AuthenticatorError> {
        let count = {
            let mut count = self.prompt_count.lock().unwrap();
            *count += 1;
            *count
        };
        if let Some(kind) = {
            let mut failures = self.failures.lock().unwrap();
            if failures.is_empty() {
                None
            } else {
                Some(failures.remove(0))
            }
        } {
            tracing::debug!(
                ceremony,
                kind = ?kind,
                event = "mock_authenticator_failure",
                "Mock authenticator failing as scripted"
            );
            return Err(AuthenticatorError::new(kind));
        }

        let credential_id = format!("mock-credential-{}", count);
        let signature = URL_SAFE_NO_PAD.encode(format!("{}:{}", ceremony, credential_id));
        tracing::debug!(
            ceremony,
            credential_id = credential_id.as_str(),
            event = "mock_authenticator_approved",
            "Mock authenticator approved the prompt"
        );
        Ok(SignedCredential {
            credential_id,
            payload: serde_json::json!({
                "signature": signature,
                "ceremony": ceremony,
            }),
        })
    }
}

#[async_trait]
impl PlatformAuthenticator for MockAuthenticator {
    async fn create_credential(
        &self,
        _options: &CeremonyOptions,
    ) -> Result<SignedCredential, AuthenticatorError> {
        self.respond("registration")
    }

    async fn get_assertion(
        &self,
        _options: &CeremonyOptions,
    ) -> Result<SignedCredential, AuthenticatorError> {
        self.respond("authentication")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> CeremonyOptions {
        CeremonyOptions {
            session_id: None,
            public_key: serde_json::json!({"challenge": "YQ"}),
        }
    }

    #[tokio::test]
    async fn test_approves_with_distinct_credentials() {
        let authenticator = MockAuthenticator::approving();
        let first = authenticator.create_credential(&options()).await.unwrap();
        let second = authenticator.get_assertion(&options()).await.unwrap();
        assert_ne!(first.credential_id, second.credential_id);
        assert_eq!(authenticator.prompt_count(), 2);
    }

    #[tokio::test]
    async fn test_scripted_failures_then_approval() {
        let authenticator =
            MockAuthenticator::failing_with(vec![AuthenticatorErrorKind::NotAllowed]);
        let error = authenticator.create_credential(&options()).await.unwrap_err();
        assert_eq!(error.kind, AuthenticatorErrorKind::NotAllowed);

        assert!(authenticator.create_credential(&options()).await.is_ok());
    }
}
