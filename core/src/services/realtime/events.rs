//! Push-channel event schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vf_shared::types::SubjectId;

/// Named event types delivered on the verification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationEventKind {
    Initiated,
    Verified,
    Failed,
    Expired,
}

impl VerificationEventKind {
    /// Parse a named event. Unknown names yield `None` and are ignored by
    /// the listener (forward compatibility).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "initiated" => Some(VerificationEventKind::Initiated),
            "verified" => Some(VerificationEventKind::Verified),
            "failed" => Some(VerificationEventKind::Failed),
            "expired" => Some(VerificationEventKind::Expired),
            _ => None,
        }
    }

    /// Whether this event ends the verification attempt. `failed` is
    /// deliberately not terminal: the user may retry within the same
    /// session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VerificationEventKind::Verified | VerificationEventKind::Expired
        )
    }
}

/// One event from the push channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationEvent {
    #[serde(rename = "type")]
    pub kind: VerificationEventKind,
    pub subject_id: SubjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl VerificationEvent {
    /// Decode a named event's JSON payload. Returns `None` for unknown
    /// event names or undecodable payloads; both are ignorable.
    pub fn decode(event_name: &str, data: &str) -> Option<Self> {
        VerificationEventKind::parse(event_name)?;
        serde_json::from_str(data).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_event() {
        let data = r#"{
            "type": "verified",
            "subjectId": "vs-1",
            "message": "Phone verified",
            "timestamp": "2026-03-01T10:00:00Z"
        }"#;
        let event = VerificationEvent::decode("verified", data).unwrap();
        assert_eq!(event.kind, VerificationEventKind::Verified);
        assert!(event.kind.is_terminal());
        assert_eq!(event.subject_id.as_str(), "vs-1");
    }

    #[test]
    fn test_unknown_event_names_are_ignorable() {
        let data = r#"{"type": "verified", "subjectId": "vs-1", "timestamp": "2026-03-01T10:00:00Z"}"#;
        assert!(VerificationEvent::decode("reauth_hint", data).is_none());
        assert!(VerificationEventKind::parse("reauth_hint").is_none());
    }

    #[test]
    fn test_failed_is_not_terminal() {
        assert!(!VerificationEventKind::Failed.is_terminal());
        assert!(!VerificationEventKind::Initiated.is_terminal());
    }
}
