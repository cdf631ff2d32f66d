//! Account service endpoint configuration

use serde::{Deserialize, Serialize};
use std::env;

/// Default base URL for the account service (development)
const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Endpoint configuration for the account service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointsConfig {
    /// Base URL for all account service requests
    pub base_url: String,

    /// Path of the mobile-verification push channel, relative to `base_url`.
    /// The channel token is appended as a query parameter because the
    /// event-stream transport does not carry custom headers.
    #[serde(default = "default_events_path")]
    pub events_path: String,

    /// Request timeout in seconds for regular calls
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_events_path() -> String {
    String::from("/mobile-verification/events")
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            events_path: default_events_path(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl EndpointsConfig {
    /// Create a configuration pointing at a specific base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Load endpoint configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("VERIFLOW_API_BASE_URL")
                .unwrap_or_else(|_| String::from(DEFAULT_BASE_URL)),
            events_path: env::var("VERIFLOW_EVENTS_PATH").unwrap_or_else(|_| default_events_path()),
            request_timeout_secs: env::var("VERIFLOW_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_request_timeout),
        }
    }

    /// Join a path onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build the push-channel URL for a verification method, carrying the
    /// channel token as a query parameter
    pub fn events_url(&self, method: &str, token: &str) -> String {
        format!(
            "{}/{}?token={}",
            self.url(&self.events_path),
            method,
            token
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join_handles_slashes() {
        let config = EndpointsConfig::new("https://api.example.com/v1/");
        assert_eq!(
            config.url("/onboarding/status"),
            "https://api.example.com/v1/onboarding/status"
        );
        assert_eq!(
            config.url("auth/login"),
            "https://api.example.com/v1/auth/login"
        );
    }

    #[test]
    fn test_events_url_carries_token_as_query() {
        let config = EndpointsConfig::new("https://api.example.com/v1");
        let url = config.events_url("whatsapp", "tok-123");
        assert_eq!(
            url,
            "https://api.example.com/v1/mobile-verification/events/whatsapp?token=tok-123"
        );
    }
}
