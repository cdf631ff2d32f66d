//! Flow controller implementation.

use tracing;

use crate::domain::entities::mfa_challenge::MfaMethod;
use crate::domain::entities::onboarding::OnboardingStep;
use crate::errors::{FlowError, FlowResult};
use crate::gateways::onboarding::OnboardingGateway;
use crate::services::status::OnboardingStatusStore;

use super::progress::SubProgress;
use super::step::{derive_step, DerivedStep};
use super::strategy::{StepArtifact, StepSignal};

/// Top-level state machine for one guided process.
///
/// Owns the injected status store and the sub-progress cursor for the
/// current server step. Step-strategy invocations are serialized through
/// the in-flight flag: callers must win [`try_begin`](Self::try_begin)
/// before invoking a strategy and report back via
/// [`complete`](Self::complete).
pub struct FlowController<G: OnboardingGateway> {
    store: OnboardingStatusStore<G>,
    sub_progress: SubProgress,
    tracked_step: Option<OnboardingStep>,
    selected_method: Option<MfaMethod>,
    in_flight: bool,
    last_error: Option<FlowError>,
}

impl<G: OnboardingGateway> FlowController<G> {
    pub fn new(store: OnboardingStatusStore<G>) -> Self {
        Self {
            store,
            sub_progress: SubProgress::new(),
            tracked_step: None,
            selected_method: None,
            in_flight: false,
            last_error: None,
        }
    }

    /// Fetch the authoritative status and derive the first step
    pub async fn init(&mut self) -> FlowResult<DerivedStep> {
        self.store.init().await?;
        self.sync_step();
        Ok(self.derived())
    }

    /// Refetch the authoritative status and re-derive
    pub async fn refresh(&mut self) -> FlowResult<DerivedStep> {
        self.store.invalidate().await?;
        self.sync_step();
        Ok(self.derived())
    }

    /// Current derivation from `(remote step, sub-progress, method)`
    pub fn derived(&self) -> DerivedStep {
        match self.store.current() {
            Some(status) => derive_step(status, self.sub_progress, self.selected_method),
            None => DerivedStep::RedirectToEntry {
                reason: "status unavailable".to_string(),
            },
        }
    }

    /// Choose the sub-method rendered inside the current step (e.g. which
    /// MFA method is being enrolled)
    pub fn select_method(&mut self, method: MfaMethod) {
        self.selected_method = Some(method);
    }

    pub fn selected_method(&self) -> Option<MfaMethod> {
        self.selected_method
    }

    /// Move the cursor forward by whole quarter steps
    pub fn advance(&mut self, quarters: u8) {
        self.sub_progress.advance(quarters);
    }

    /// Step back within the current server step. Refused while a strategy
    /// is in flight and at the top of the server step.
    pub fn back(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.last_error = None;
        self.sub_progress.back()
    }

    /// Reset local sub-state; the server step is untouched
    pub fn reset(&mut self) {
        self.sub_progress.reset();
        self.selected_method = None;
        self.last_error = None;
        self.in_flight = false;
    }

    /// Tear down this controller instance
    pub fn dispose(&mut self) {
        self.reset();
        self.store.dispose();
        self.tracked_step = None;
    }

    /// Claim the in-flight slot before invoking a step strategy. Returns
    /// false if a prior invocation for this step is still running; the
    /// caller must not start another.
    pub fn try_begin(&mut self) -> bool {
        if self.in_flight {
            tracing::debug!(
                event = "step_reentry_refused",
                "Step strategy already in flight"
            );
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Inline error from the last strategy invocation, if any
    pub fn last_error(&self) -> Option<&FlowError> {
        self.last_error.as_ref()
    }

    /// Report a step strategy's outcome and re-derive.
    ///
    /// Advance signals move the cursor (and adopt any fresh status the
    /// strategy's endpoint returned); step-local errors stay on the step
    /// with the error surfaced inline; flow-fatal errors short-circuit to
    /// a redirect.
    pub fn complete(&mut self, signal: StepSignal) -> DerivedStep {
        self.in_flight = false;
        match signal {
            StepSignal::Advance { artifact } => {
                self.last_error = None;
                match artifact {
                    StepArtifact::Status(status) => {
                        self.store.replace(status);
                        self.sync_step();
                    }
                    _ => self.sub_progress.advance(1),
                }
                tracing::debug!(
                    sub_progress = self.sub_progress.value(),
                    event = "step_advanced",
                    "Step strategy advanced"
                );
                self.derived()
            }
            StepSignal::Stay { error } => {
                if error.is_fatal() {
                    tracing::warn!(
                        error = %error,
                        event = "flow_fatal",
                        "Flow-fatal error; redirecting to entry"
                    );
                    self.reset();
                    return DerivedStep::RedirectToEntry {
                        reason: error.user_message(),
                    };
                }
                self.last_error = Some(error);
                self.derived()
            }
        }
    }

    /// A server-step transition invalidates all sub-progress
    fn sync_step(&mut self) {
        let current = self
            .store
            .current()
            .map(|status| status.current_step.clone());
        if current != self.tracked_step {
            tracing::debug!(
                from = self.tracked_step.as_ref().map(|s| s.as_str()).unwrap_or("-"),
                to = current.as_ref().map(|s| s.as_str()).unwrap_or("-"),
                event = "server_step_changed",
                "Server step changed; sub-progress reset"
            );
            self.tracked_step = current;
            self.sub_progress.reset();
            self.selected_method = None;
            self.last_error = None;
        }
    }

    /// Access to the underlying store's gateway for building step
    /// strategies
    pub fn gateway(&self) -> std::sync::Arc<G> {
        self.store.gateway()
    }
}
