//! Integration tests: login routing and a full onboarding walk through
//! the flow controller.

use std::sync::Arc;

use vf_core::domain::entities::mfa_challenge::MfaMethod;
use vf_core::domain::entities::onboarding::OnboardingStep;
use vf_core::domain::value_objects::auth_session::LoginOutcome;
use vf_core::gateways::auth::{AuthGateway, MockAuthGateway};
use vf_core::gateways::onboarding::MockOnboardingGateway;
use vf_core::gateways::types::LoginRequest;
use vf_core::services::flow::{DerivedStep, FlowController, StepArtifact, StepSignal};
use vf_core::services::status::OnboardingStatusStore;

fn fixture(step: OnboardingStep) -> vf_core::domain::entities::onboarding::OnboardingStatus {
    MockOnboardingGateway::status_fixture(step)
}

#[tokio::test]
async fn login_requiring_onboarding_routes_to_email_verification() {
    let auth = Arc::new(MockAuthGateway::new());
    let mut session = MockAuthGateway::session_fixture();
    session.requires_onboarding = true;
    session.onboarding_step = Some(OnboardingStep::EmailVerification);
    auth.push_login(Ok(LoginOutcome::Session(session)));

    let outcome = auth
        .login(LoginRequest {
            email: "alice@example.com".to_string(),
            password: "correct-horse".to_string(),
        })
        .await
        .unwrap();
    let session = outcome.session().expect("no second factor required");
    assert!(session.requires_onboarding);

    // The controller lands on the same step, not on the dashboard
    let onboarding = Arc::new(MockOnboardingGateway::new());
    onboarding.push_status(fixture(OnboardingStep::EmailVerification));
    let mut controller = FlowController::new(OnboardingStatusStore::new(onboarding));
    let derived = controller.init().await.unwrap();
    assert_eq!(
        derived,
        DerivedStep::Render {
            step: OnboardingStep::EmailVerification,
            sub_progress: 0,
            method: None,
        }
    );
}

#[tokio::test]
async fn onboarding_walk_resets_sub_progress_at_every_server_step() {
    let gateway = Arc::new(MockOnboardingGateway::new());
    gateway.push_status(fixture(OnboardingStep::EmailVerification));

    let mut controller = FlowController::new(OnboardingStatusStore::new(gateway));
    controller.init().await.unwrap();

    // Email step: advance local sub-progress, then the verify endpoint
    // returns a status already on the next server step
    controller.advance(1);
    assert!(controller.try_begin());
    let derived = controller.complete(StepSignal::advance_with(StepArtifact::Status(fixture(
        OnboardingStep::MfaSetup,
    ))));
    assert_eq!(
        derived,
        DerivedStep::Render {
            step: OnboardingStep::MfaSetup,
            sub_progress: 0,
            method: None,
        }
    );

    // MFA step: pick a method, move through its sub-steps
    controller.select_method(MfaMethod::Totp);
    controller.advance(2);
    assert!(controller.try_begin());
    let derived = controller.complete(StepSignal::advance_with(StepArtifact::Status(fixture(
        OnboardingStep::MobileVerification,
    ))));
    assert_eq!(
        derived,
        DerivedStep::Render {
            step: OnboardingStep::MobileVerification,
            sub_progress: 0,
            method: None,
        }
    );

    // Mobile step completes the onboarding: leave the flow entirely
    assert!(controller.try_begin());
    let derived = controller.complete(StepSignal::advance_with(StepArtifact::Status(fixture(
        OnboardingStep::Complete,
    ))));
    assert_eq!(derived, DerivedStep::LeaveFlow);
}

#[tokio::test]
async fn reload_re_derives_the_same_step_from_remote_state_alone() {
    let gateway = Arc::new(MockOnboardingGateway::new());
    gateway.push_status(fixture(OnboardingStep::MfaSetup));

    // First "page load": user had advanced inside the step
    let mut first = FlowController::new(OnboardingStatusStore::new(gateway.clone()));
    first.init().await.unwrap();
    first.advance(2);

    // Reload: sub-progress is gone by design; the step re-derives from
    // the server step at its start
    let mut second = FlowController::new(OnboardingStatusStore::new(gateway));
    let derived = second.init().await.unwrap();
    assert_eq!(
        derived,
        DerivedStep::Render {
            step: OnboardingStep::MfaSetup,
            sub_progress: 0,
            method: None,
        }
    );
}

#[tokio::test]
async fn alias_step_names_land_on_the_same_canonical_step() {
    for raw in ["MOBILE_VERIFICATION", "PHONE_VERIFICATION"] {
        let gateway = Arc::new(MockOnboardingGateway::new());
        gateway.push_status(fixture(OnboardingStep::parse(raw)));
        let mut controller = FlowController::new(OnboardingStatusStore::new(gateway));
        let derived = controller.init().await.unwrap();
        assert_eq!(
            derived,
            DerivedStep::Render {
                step: OnboardingStep::MobileVerification,
                sub_progress: 0,
                method: None,
            },
            "alias {raw} must normalize"
        );
    }
}
