//! Mobile verification gateway module.

pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;

mod mock;
pub use mock::MockMobileVerificationGateway;
pub use r#trait::MobileVerificationGateway;
