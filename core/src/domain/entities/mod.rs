//! Domain entities

pub mod backup_codes;
pub mod contact_change;
pub mod mfa_challenge;
pub mod onboarding;
pub mod verification_session;

pub use backup_codes::BackupCodes;
pub use contact_change::{ContactChangePhase, ContactChangeState, ContactChannel};
pub use mfa_challenge::{MfaChallenge, MfaMethod};
pub use onboarding::{OnboardingStatus, OnboardingStep, SignupMethod};
pub use verification_session::{VerificationMethod, VerificationSession, VerificationState};
