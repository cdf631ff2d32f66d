//! Password-reset gateway module.

pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;

mod mock;
pub use mock::MockPasswordResetGateway;
pub use r#trait::PasswordResetGateway;
