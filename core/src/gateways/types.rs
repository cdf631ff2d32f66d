//! Request and response payloads shared by the gateway traits.
//!
//! Only the fields the state machines act on are modeled; everything else
//! the server returns is ignored at the ingestion boundary.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::verification_session::{VerificationMethod, VerificationState};
use vf_shared::types::SubjectId;

/// Payload for `POST /auth/signup`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Payload for `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Payload for `POST /onboarding/register`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
}

/// Payload for `POST /mobile-verification/initiate`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InitiateMobileVerification {
    pub method: VerificationMethod,
    #[validate(length(min = 7, max = 16))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 4))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_country: Option<String>,
}

/// Receipt for any "send/resend a code" operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendReceipt {
    /// Server acknowledgment text, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Seconds until the next resend is allowed
    pub next_resend_secs: u64,
}

/// Secret material for TOTP enrollment (`POST .../mfa/totp/initiate`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotpEnrollment {
    /// Base32 shared secret for manual entry
    pub secret: String,
    /// otpauth:// URL encoded into the setup QR code
    pub otpauth_url: String,
}

/// Snapshot from `GET /mobile-verification/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileVerificationStatus {
    pub state: VerificationState,
}

/// Result of `request-identity-verification`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityVerification {
    pub verification_id: SubjectId,
    /// Masked rendering of the contact point the OTP went to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked_contact: Option<String>,
}

/// Capability issued by `verify-identity`; gates the rest of the saga
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAuthorization {
    pub change_request_id: SubjectId,
    pub change_requests_today: u32,
}

/// Result of `submit-new-{email|phone}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSubmission {
    pub change_verification_id: SubjectId,
    pub change_requests_today: u32,
}

/// Result of `verify-new-{email|phone}`: the change is applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeCompletion {
    /// Single-use, time-boxed credential to undo the change
    pub revert_token: String,
}

/// Ceremony options returned by a `passkey/options` endpoint.
///
/// `public_key` is the platform-facing options document; this layer treats
/// it as opaque and hands it to the authenticator untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CeremonyOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SubjectId>,
    pub public_key: serde_json::Value,
}

/// Signed attestation/assertion produced by the platform authenticator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedCredential {
    pub credential_id: String,
    /// Signed payload; opaque to this layer, verified server-side
    pub payload: serde_json::Value,
}

/// Session opened by a password-reset request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetSession {
    pub reset_session_id: SubjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_validation() {
        let ok = SignupRequest {
            email: "alice@example.com".into(),
            password: "correct-horse".into(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = SignupRequest {
            email: "alice".into(),
            password: "correct-horse".into(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = SignupRequest {
            email: "alice@example.com".into(),
            password: "short".into(),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_initiate_serializes_camel_case() {
        let request = InitiateMobileVerification {
            method: VerificationMethod::Whatsapp,
            phone: Some("+61412345678".into()),
            phone_country: Some("AU".into()),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["method"], "whatsapp");
        assert_eq!(json["phoneCountry"], "AU");
    }
}
