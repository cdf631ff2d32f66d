//! Shared utilities and common types for the Veriflow client
//!
//! This crate provides common functionality used across the client crates:
//! - Configuration types
//! - Response envelope structures
//! - Utility functions (phone/email validation, contact masking)
//! - Common type definitions

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    ClientConfig, EndpointsConfig, Environment, FlowConfig, LoggingConfig, RealtimeConfig,
};
pub use types::{ApiResponse, ErrorResponse, Timestamp};
pub use utils::{contact, validation};
