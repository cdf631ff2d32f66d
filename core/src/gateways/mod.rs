//! Gateway traits forming the boundary to the account service.
//!
//! The server is an opaque authority: these ports expose exactly the
//! operations the flow state machines act on, and infrastructure provides
//! the HTTP implementations. Each area ships a hand-written mock for
//! constructing flows against fixtures.

pub mod auth;
pub mod contact;
pub mod mobile;
pub mod onboarding;
pub mod reset;
pub mod types;

pub use auth::{AuthGateway, MockAuthGateway};
pub use contact::{ContactChangeGateway, MockContactChangeGateway};
pub use mobile::{MobileVerificationGateway, MockMobileVerificationGateway};
pub use onboarding::{MockOnboardingGateway, OnboardingGateway};
pub use reset::{MockPasswordResetGateway, PasswordResetGateway};
pub use types::{
    CeremonyOptions, ChangeAuthorization, ChangeCompletion, ChangeSubmission,
    IdentityVerification, InitiateMobileVerification, LoginRequest, MobileVerificationStatus,
    RegisterRequest, ResendReceipt, ResetSession, SignedCredential, SignupRequest,
    TotpEnrollment,
};
