//! # Veriflow Core
//!
//! Verification and flow orchestration state machines for the Veriflow
//! client. This crate contains domain entities, the gateway traits that
//! form the boundary to the account service, the step-strategy services
//! (OTP, WebAuthn, realtime), and the flow controllers that compose them.

pub mod domain;
pub mod errors;
pub mod gateways;
pub mod services;

// Re-export commonly used types at crate root
pub use domain::entities::{
    BackupCodes, ContactChangePhase, ContactChangeState, ContactChannel, MfaChallenge, MfaMethod,
    OnboardingStatus, OnboardingStep, SignupMethod, VerificationMethod, VerificationSession,
    VerificationState,
};
pub use domain::value_objects::{AuthSession, LoginOutcome};
pub use errors::{
    CeremonyError, ChallengeError, ChannelError, FlowError, FlowResult, ValidationError,
};
pub use gateways::{
    AuthGateway, ContactChangeGateway, MobileVerificationGateway, OnboardingGateway,
    PasswordResetGateway,
};
pub use services::{
    ContactChangeSaga, DerivedStep, FlowController, MfaEnrollmentFlow, MfaLoginFlow,
    MobileVerificationFlow, OnboardingStatusStore, OtpChallenge, PasswordResetFlow,
    RealtimeListener, ResendTimer,
};
