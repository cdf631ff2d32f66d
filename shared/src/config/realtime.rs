//! Realtime channel reconnect and polling cadence

use serde::{Deserialize, Serialize};

/// Cadence configuration for the realtime verification channel
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RealtimeConfig {
    /// Initial reconnect delay in milliseconds
    #[serde(default = "default_reconnect_base")]
    pub reconnect_base_ms: u64,

    /// Maximum reconnect delay in milliseconds
    #[serde(default = "default_reconnect_max")]
    pub reconnect_max_ms: u64,

    /// Maximum reconnect attempts before the channel reports itself closed.
    /// `0` means retry forever.
    #[serde(default = "default_max_reconnects")]
    pub max_reconnect_attempts: u32,
}

fn default_reconnect_base() -> u64 {
    500
}

fn default_reconnect_max() -> u64 {
    15_000
}

fn default_max_reconnects() -> u32 {
    0
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            reconnect_base_ms: default_reconnect_base(),
            reconnect_max_ms: default_reconnect_max(),
            max_reconnect_attempts: default_max_reconnects(),
        }
    }
}

impl RealtimeConfig {
    /// Exponential backoff delay for the given retry attempt, capped at
    /// `reconnect_max_ms`
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let factor = 2u64.saturating_pow(attempt.min(16));
        self.reconnect_base_ms
            .saturating_mul(factor)
            .min(self.reconnect_max_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let config = RealtimeConfig::default();
        assert_eq!(config.backoff_ms(0), 500);
        assert_eq!(config.backoff_ms(1), 1_000);
        assert_eq!(config.backoff_ms(2), 2_000);
        assert_eq!(config.backoff_ms(10), 15_000);
        assert_eq!(config.backoff_ms(u32::MAX), 15_000);
    }
}
