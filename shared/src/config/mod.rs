//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `endpoints` - Account service base URL and channel paths
//! - `environment` - Environment detection and logging configuration
//! - `flow` - Flow orchestration timing (OTP length, cooldowns, windows)
//! - `realtime` - Realtime channel reconnect and polling cadence

pub mod endpoints;
pub mod environment;
pub mod flow;
pub mod realtime;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use endpoints::EndpointsConfig;
pub use environment::{Environment, LoggingConfig};
pub use flow::FlowConfig;
pub use realtime::RealtimeConfig;

/// Complete client configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Account service endpoints
    pub endpoints: EndpointsConfig,

    /// Flow orchestration timing
    #[serde(default)]
    pub flow: FlowConfig,

    /// Realtime channel cadence
    #[serde(default)]
    pub realtime: RealtimeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            endpoints: EndpointsConfig::default(),
            flow: FlowConfig::default(),
            realtime: RealtimeConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            endpoints: EndpointsConfig::from_env(),
            flow: FlowConfig::default(),
            realtime: RealtimeConfig::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Check if running against a development backend
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }

    /// Check if running against the production backend
    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}
