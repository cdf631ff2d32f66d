//! Onboarding status entity and the canonical step enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical onboarding step reported by the account service.
///
/// The server has grown synonym step names over time; every raw step name
/// passes through [`OnboardingStep::parse`] exactly once at the ingestion
/// boundary, and all derivation logic operates only on this canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OnboardingStep {
    EmailVerification,
    MfaSetup,
    MobileVerification,
    Complete,
    /// A step name this client does not recognize. Preserved for logging;
    /// flow-fatal at derivation time.
    Unknown(String),
}

impl OnboardingStep {
    /// Normalize a raw server step name, folding known aliases.
    ///
    /// This is the single alias-normalization point; nothing else in the
    /// workspace compares raw step strings.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "EMAIL_VERIFICATION" => OnboardingStep::EmailVerification,
            "MFA_SETUP" | "TWO_FACTOR_SETUP" => OnboardingStep::MfaSetup,
            "MOBILE_VERIFICATION" | "PHONE_VERIFICATION" => OnboardingStep::MobileVerification,
            "COMPLETE" | "COMPLETED" => OnboardingStep::Complete,
            _ => OnboardingStep::Unknown(raw.to_string()),
        }
    }

    /// Canonical wire name
    pub fn as_str(&self) -> &str {
        match self {
            OnboardingStep::EmailVerification => "EMAIL_VERIFICATION",
            OnboardingStep::MfaSetup => "MFA_SETUP",
            OnboardingStep::MobileVerification => "MOBILE_VERIFICATION",
            OnboardingStep::Complete => "COMPLETE",
            OnboardingStep::Unknown(raw) => raw,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, OnboardingStep::Unknown(_))
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for OnboardingStep {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OnboardingStep {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(OnboardingStep::parse(&raw))
    }
}

/// How the account was originally created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignupMethod {
    Email,
    Oauth,
}

/// Server-authoritative onboarding status snapshot, refetchable at any time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    /// Current guided step. Meaningful only while `onboarding_complete`
    /// is false.
    pub current_step: OnboardingStep,

    /// Once true, no step renders; the caller leaves the flow entirely
    pub onboarding_complete: bool,

    /// Account email
    pub email: String,

    /// How the account was created
    pub signup_method: SignupMethod,

    /// Whether the email contact point is verified
    pub email_verified: bool,

    /// Whether the phone contact point is verified
    pub phone_verified: bool,
}

impl OnboardingStatus {
    /// Whether any step should render at all
    pub fn in_progress(&self) -> bool {
        !self.onboarding_complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        assert_eq!(
            OnboardingStep::parse("EMAIL_VERIFICATION"),
            OnboardingStep::EmailVerification
        );
        assert_eq!(OnboardingStep::parse("MFA_SETUP"), OnboardingStep::MfaSetup);
        assert_eq!(
            OnboardingStep::parse("MOBILE_VERIFICATION"),
            OnboardingStep::MobileVerification
        );
        assert_eq!(OnboardingStep::parse("COMPLETE"), OnboardingStep::Complete);
    }

    #[test]
    fn test_parse_folds_aliases() {
        assert_eq!(
            OnboardingStep::parse("PHONE_VERIFICATION"),
            OnboardingStep::MobileVerification
        );
        assert_eq!(
            OnboardingStep::parse("TWO_FACTOR_SETUP"),
            OnboardingStep::MfaSetup
        );
        // Case and whitespace tolerant
        assert_eq!(
            OnboardingStep::parse(" phone_verification "),
            OnboardingStep::MobileVerification
        );
    }

    #[test]
    fn test_parse_preserves_unknown() {
        let step = OnboardingStep::parse("LEGACY_KYC_STEP");
        assert!(step.is_unknown());
        assert_eq!(step.as_str(), "LEGACY_KYC_STEP");
    }

    #[test]
    fn test_status_deserializes_from_wire_shape() {
        let json = r#"{
            "currentStep": "PHONE_VERIFICATION",
            "onboardingComplete": false,
            "email": "alice@example.com",
            "signupMethod": "email",
            "emailVerified": true,
            "phoneVerified": false
        }"#;
        let status: OnboardingStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.current_step, OnboardingStep::MobileVerification);
        assert!(status.in_progress());
        assert!(status.email_verified);
    }
}
