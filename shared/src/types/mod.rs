//! Type definitions module
//!
//! - `common` - Common aliases and small shared types
//! - `response` - API response envelope and error payloads

pub mod common;
pub mod response;

// Re-export commonly used types at module level
pub use common::{SubjectId, Timestamp, Uuid};
pub use response::{ApiResponse, ErrorResponse};
