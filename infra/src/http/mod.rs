//! HTTP gateway implementations.
//!
//! One client wraps the transport (base URL, bearer credential, response
//! envelope, error-code mapping); one gateway struct per core port builds
//! on it.

pub mod auth_gateway;
pub mod client;
pub mod contact_gateway;
pub mod mobile_gateway;
pub mod onboarding_gateway;
pub mod reset_gateway;

pub use auth_gateway::HttpAuthGateway;
pub use client::HttpClient;
pub use contact_gateway::HttpContactChangeGateway;
pub use mobile_gateway::HttpMobileVerificationGateway;
pub use onboarding_gateway::HttpOnboardingGateway;
pub use reset_gateway::HttpPasswordResetGateway;
