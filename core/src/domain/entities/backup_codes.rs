//! Backup codes issued after a successful MFA-method enrollment.

use serde::{Deserialize, Serialize};

/// One-time recovery codes produced once per successful MFA enrollment.
///
/// The server keeps no proof that the codes were shown; acknowledgment is a
/// client-only gate, and enrollment is not complete until it happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupCodes {
    /// Recovery codes in server display order
    pub backup_codes: Vec<String>,

    /// Warning text to surface alongside the codes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,

    /// Client-side display gate; never sent to the server
    #[serde(skip, default)]
    acknowledged: bool,
}

impl BackupCodes {
    pub fn new(backup_codes: Vec<String>, warning: Option<String>) -> Self {
        Self {
            backup_codes,
            warning,
            acknowledged: false,
        }
    }

    /// Record that the user confirmed they saved the codes
    pub fn acknowledge(&mut self) {
        self.acknowledged = true;
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acknowledgment_gate_starts_closed() {
        let mut codes = BackupCodes::new(vec!["aaaa-1111".into(), "bbbb-2222".into()], None);
        assert!(!codes.is_acknowledged());
        codes.acknowledge();
        assert!(codes.is_acknowledged());
    }

    #[test]
    fn test_acknowledgment_not_serialized() {
        let mut codes = BackupCodes::new(vec!["aaaa-1111".into()], Some("Store safely".into()));
        codes.acknowledge();
        let json = serde_json::to_string(&codes).unwrap();
        assert!(!json.contains("acknowledged"));

        // And it never round-trips as acknowledged
        let back: BackupCodes = serde_json::from_str(&json).unwrap();
        assert!(!back.is_acknowledged());
        assert_eq!(back.backup_codes, codes.backup_codes);
    }
}
