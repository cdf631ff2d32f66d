//! Passkey ceremony adapter.
//!
//! Wraps both ceremony types (registration, authentication) as one
//! asynchronous operation with an explicit three-phase shape:
//! fetch options from the server, invoke the platform authenticator
//! (indefinite, user-controlled), submit the signed result back.

pub mod ceremony;
pub mod traits;
pub mod types;

pub use ceremony::{CeremonyAdapter, CeremonyGateway};
pub use traits::{AuthenticatorError, AuthenticatorErrorKind, PlatformAuthenticator};
pub use types::{CeremonyKind, CeremonyPhase};
