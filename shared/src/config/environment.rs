//! Environment configuration module

use serde::{Deserialize, Serialize};
use std::env;

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    Development,
    /// Staging/test environment
    Staging,
    /// Production environment
    Production,
}

impl Environment {
    /// Check if running in production
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Check if running in staging
    pub fn is_staging(&self) -> bool {
        matches!(self, Environment::Staging)
    }

    /// Get environment from ENV variable
    pub fn from_env() -> Self {
        env::var("ENVIRONMENT")
            .or_else(|_| env::var("ENV"))
            .or_else(|_| env::var("RUST_ENV"))
            .unwrap_or_else(|_| String::from("development"))
            .parse()
            .unwrap_or(Environment::Development)
    }

    /// Check if debug mode should be enabled
    pub fn is_debug(&self) -> bool {
        match self {
            Environment::Development => true,
            Environment::Staging => true,
            Environment::Production => false,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable colored output (terminal only)
    #[serde(default = "default_colored")]
    pub colored: bool,

    /// Include span events for flow transitions
    #[serde(default)]
    pub span_events: bool,
}

fn default_colored() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            colored: true,
            span_events: false,
        }
    }
}

impl LoggingConfig {
    /// Get the logging configuration appropriate for an environment
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: String::from("debug"),
                colored: true,
                span_events: true,
            },
            Environment::Staging => Self {
                level: String::from("debug"),
                colored: false,
                span_events: false,
            },
            Environment::Production => Self {
                level: String::from("info"),
                colored: false,
                span_events: false,
            },
        }
    }

    /// Build an `EnvFilter`-compatible directive string
    pub fn filter_directive(&self) -> String {
        format!("vf_core={level},vf_infra={level}", level = self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Development));
        assert_eq!("PROD".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("test".parse::<Environment>(), Ok(Environment::Staging));
        assert!("sandbox".parse::<Environment>().is_err());
    }

    #[test]
    fn test_logging_config_for_environment() {
        let dev = LoggingConfig::for_environment(Environment::Development);
        assert_eq!(dev.level, "debug");
        assert!(dev.colored);

        let prod = LoggingConfig::for_environment(Environment::Production);
        assert_eq!(prod.level, "info");
        assert!(!prod.colored);
    }

    #[test]
    fn test_filter_directive() {
        let config = LoggingConfig::default();
        assert_eq!(config.filter_directive(), "vf_core=info,vf_infra=info");
    }
}
