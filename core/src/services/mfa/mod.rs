//! Multi-factor flows: answering a login challenge and enrolling methods.

pub mod enrollment;
pub mod login;

pub use enrollment::MfaEnrollmentFlow;
pub use login::MfaLoginFlow;
