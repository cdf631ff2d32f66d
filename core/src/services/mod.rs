//! Flow orchestration services.
//!
//! One implementation per step-strategy contract — OTP challenge,
//! passkey ceremony, realtime listener — composed by the flow
//! controllers; no per-screen re-derivations.

pub mod contact_change;
pub mod flow;
pub mod mfa;
pub mod mobile;
pub mod otp;
pub mod realtime;
pub mod reset;
pub mod status;
pub mod webauthn;

// Re-export the main service types
pub use contact_change::{ContactChangeConfig, ContactChangeSaga};
pub use flow::{derive_step, DerivedStep, FlowController, StepArtifact, StepSignal, SubProgress};
pub use mfa::{MfaEnrollmentFlow, MfaLoginFlow};
pub use mobile::MobileVerificationFlow;
pub use otp::{ClearPolicy, OtpChallenge, OtpConfig, OtpSubmitter, ResendTimer};
pub use realtime::{
    ChannelHandle, ChannelMessage, EventChannel, RealtimeListener, StatusPoller,
    VerificationEvent, VerificationEventKind,
};
pub use reset::{PasswordResetFlow, ResetStage};
pub use status::OnboardingStatusStore;
pub use webauthn::{
    AuthenticatorError, AuthenticatorErrorKind, CeremonyAdapter, CeremonyGateway, CeremonyKind,
    CeremonyPhase, PlatformAuthenticator,
};
