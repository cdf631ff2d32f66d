//! Verification session entity for externally-triggered mobile
//! verification (scan-a-code flows).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the user proves control of their phone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    /// Scan a code / message via WhatsApp; completion arrives over the
    /// push channel
    Whatsapp,
    /// Six-digit code via SMS
    Sms,
}

/// Coarse verification state reported by the status endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationState {
    Pending,
    Verified,
    Failed,
    Expired,
}

impl VerificationState {
    /// Whether this state ends the verification attempt
    pub fn is_terminal(&self) -> bool {
        matches!(self, VerificationState::Verified | VerificationState::Expired)
    }
}

/// A pending externally-triggered verification.
///
/// Created by "initiate", watched by the realtime listener, terminated by
/// exactly one of verified/failed/expired. A new initiation always
/// supersedes a prior session for the same subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSession {
    /// Token identifying this attempt; also authenticates the push channel
    pub verification_token: String,

    /// Human instructions for completing the verification
    pub instructions: String,

    /// Number to message for WhatsApp-style verification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,

    /// When this attempt lapses server-side
    pub expires_at: DateTime<Utc>,
}

impl VerificationSession {
    /// Whether the attempt has lapsed client-side. The server remains
    /// authoritative; this only gates UI hints.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_terminal_states() {
        assert!(VerificationState::Verified.is_terminal());
        assert!(VerificationState::Expired.is_terminal());
        assert!(!VerificationState::Pending.is_terminal());
        // Failed attempts can still be retried within the same session
        assert!(!VerificationState::Failed.is_terminal());
    }

    #[test]
    fn test_expiry_hint() {
        let session = VerificationSession {
            verification_token: "vt-1".into(),
            instructions: "Send the code".into(),
            whatsapp_number: Some("+14155550100".into()),
            expires_at: Utc::now() - Duration::seconds(1),
        };
        assert!(session.is_expired());
    }
}
