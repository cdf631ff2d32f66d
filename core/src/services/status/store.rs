//! Explicitly-constructed store for the server-authoritative onboarding
//! status.
//!
//! Injected into flow controllers rather than read through ambient
//! lookup, with a defined init / invalidate / dispose lifecycle, so tests
//! construct controllers against fixtures.

use std::sync::Arc;
use tracing;

use crate::domain::entities::onboarding::OnboardingStatus;
use crate::errors::FlowResult;
use crate::gateways::onboarding::OnboardingGateway;

/// Holds the latest fetched [`OnboardingStatus`] for one flow instance.
///
/// The snapshot is never assumed fresh across flow boundaries: a new flow
/// constructs its own store and calls `init`.
pub struct OnboardingStatusStore<G: OnboardingGateway> {
    gateway: Arc<G>,
    status: Option<OnboardingStatus>,
}

impl<G: OnboardingGateway> OnboardingStatusStore<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            status: None,
        }
    }

    /// Fetch the status if it has not been fetched yet
    pub async fn init(&mut self) -> FlowResult<()> {
        if self.status.is_none() {
            let status = self.gateway.status().await?;
            tracing::debug!(
                step = %status.current_step,
                complete = status.onboarding_complete,
                event = "status_initialized",
                "Fetched onboarding status"
            );
            self.status = Some(status);
        }
        Ok(())
    }

    /// Discard the snapshot and refetch
    pub async fn invalidate(&mut self) -> FlowResult<()> {
        let status = self.gateway.status().await?;
        self.status = Some(status);
        Ok(())
    }

    /// Replace the snapshot with one returned by a mutation endpoint
    pub fn replace(&mut self, status: OnboardingStatus) {
        self.status = Some(status);
    }

    /// Latest snapshot, if any
    pub fn current(&self) -> Option<&OnboardingStatus> {
        self.status.as_ref()
    }

    /// Drop the snapshot (unmount path)
    pub fn dispose(&mut self) {
        self.status = None;
    }

    pub fn gateway(&self) -> Arc<G> {
        Arc::clone(&self.gateway)
    }
}
