//! # Veriflow Infrastructure
//!
//! Implementations of the core gateway and channel ports: reqwest-based
//! HTTP gateways for the account service, a server-sent-events channel
//! for realtime verification, and platform-authenticator adapters.

pub mod authenticator;
pub mod http;
pub mod sse;

pub use authenticator::{create_authenticator, MockAuthenticator, UnsupportedAuthenticator};
pub use http::{
    HttpAuthGateway, HttpClient, HttpContactChangeGateway, HttpMobileVerificationGateway,
    HttpOnboardingGateway, HttpPasswordResetGateway,
};
pub use sse::{SseEventChannel, SseFrame, SseParser};
