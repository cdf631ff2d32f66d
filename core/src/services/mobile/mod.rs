//! Mobile verification flow.

pub mod flow;

pub use flow::MobileVerificationFlow;
