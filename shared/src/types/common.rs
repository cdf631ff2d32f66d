//! Common type definitions and utilities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// UUID v4 type alias for consistency
pub type Uuid = uuid::Uuid;

/// Timestamp type alias
pub type Timestamp = DateTime<Utc>;

/// Opaque identifier for the subject of a verification (a pending
/// verification session, an MFA challenge, a change request).
///
/// Server-issued; the client never inspects its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SubjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SubjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_id_display_and_serde() {
        let id = SubjectId::new("vs-42");
        assert_eq!(id.to_string(), "vs-42");

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"vs-42\"");

        let back: SubjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
