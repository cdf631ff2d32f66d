//! Platform authenticator adapters.
//!
//! The real authenticator lives in the embedding host (browser or OS);
//! this module provides the development mock and the fallback for hosts
//! without credential support.

pub mod mock;
pub mod unsupported;

pub use mock::MockAuthenticator;
pub use unsupported::UnsupportedAuthenticator;

use std::sync::Arc;
use vf_core::services::webauthn::PlatformAuthenticator;

/// Create an authenticator by configuration name.
///
/// Unrecognized names fall back to the unsupported adapter: every
/// ceremony then fails with the "pick another method" error rather than
/// a panic.
pub fn create_authenticator(kind: &str) -> Arc<dyn PlatformAuthenticator> {
    match kind {
        "mock" => Arc::new(MockAuthenticator::approving()),
        _ => Arc::new(UnsupportedAuthenticator),
    }
}
