//! Multi-factor challenge entity issued by a login attempt.

use serde::{Deserialize, Serialize};
use std::fmt;
use vf_shared::types::SubjectId;

/// A second-factor method the account service can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MfaMethod {
    Totp,
    Sms,
    Passkey,
}

impl fmt::Display for MfaMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MfaMethod::Totp => write!(f, "totp"),
            MfaMethod::Sms => write!(f, "sms"),
            MfaMethod::Passkey => write!(f, "passkey"),
        }
    }
}

/// Multi-factor challenge created when a login attempt requires a second
/// factor.
///
/// Consumed exactly once: either successfully (yielding a session) or by
/// abandonment. The server expires abandoned challenges; the client holds
/// no local expiry and treats server rejection as the expiry signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaChallenge {
    /// Challenge session identifier, echoed on every verification call
    pub session_id: SubjectId,

    /// Methods this account can answer with
    pub available_methods: Vec<MfaMethod>,

    /// Method the server suggests presenting first
    pub default_method: MfaMethod,

    /// Masked phone for SMS display (e.g. "+61****5678")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked_phone: Option<String>,
}

impl MfaChallenge {
    /// The method to present initially: the default if the server listed
    /// it as available, otherwise the first available method
    pub fn initial_method(&self) -> Option<MfaMethod> {
        if self.available_methods.contains(&self.default_method) {
            Some(self.default_method)
        } else {
            self.available_methods.first().copied()
        }
    }

    /// Methods offered by the switcher: everything available except the
    /// one currently selected
    pub fn switch_methods(&self, selected: MfaMethod) -> Vec<MfaMethod> {
        self.available_methods
            .iter()
            .copied()
            .filter(|m| *m != selected)
            .collect()
    }

    /// Whether a method can be selected for this challenge
    pub fn supports(&self, method: MfaMethod) -> bool {
        self.available_methods.contains(&method)
    }
}
