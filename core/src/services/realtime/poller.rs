//! Polling fallback for the realtime listener.

use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing;

use crate::domain::entities::verification_session::VerificationState;
use crate::errors::FlowResult;
use crate::gateways::mobile::MobileVerificationGateway;

/// Fixed-interval status poller, composed alongside the listener as a
/// degraded-mode substitute when no push channel is available.
///
/// The `gate` closure decides whether a tick actually hits the network;
/// callers pass "listener is not connected" so polling stays quiet while
/// the push channel is healthy.
pub struct StatusPoller<G: MobileVerificationGateway> {
    gateway: Arc<G>,
    poll_interval: Duration,
}

impl<G: MobileVerificationGateway> StatusPoller<G> {
    pub fn new(gateway: Arc<G>, poll_interval_secs: u64) -> Self {
        Self {
            gateway,
            poll_interval: Duration::from_secs(poll_interval_secs),
        }
    }

    /// Poll until a non-pending state is observed. Transient gateway
    /// errors are logged and retried on the next tick; flow-fatal errors
    /// propagate.
    pub async fn next_outcome<F>(&self, gate: F) -> FlowResult<VerificationState>
    where
        F: Fn() -> bool + Send,
    {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of `interval` fires immediately; consume it so
        // every status check is a full interval apart
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if !gate() {
                continue;
            }
            match self.gateway.status().await {
                Ok(status) if status.state != VerificationState::Pending => {
                    tracing::debug!(
                        state = ?status.state,
                        event = "poll_outcome",
                        "Status poll observed a verification outcome"
                    );
                    return Ok(status.state);
                }
                Ok(_) => {}
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    tracing::warn!(
                        error = %error,
                        event = "poll_failed",
                        "Status poll failed; retrying on next tick"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateways::mobile::MockMobileVerificationGateway;

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_non_pending() {
        let gateway = Arc::new(MockMobileVerificationGateway::new());
        gateway.push_state(VerificationState::Pending);
        gateway.push_state(VerificationState::Pending);
        gateway.push_state(VerificationState::Verified);

        let poller = StatusPoller::new(gateway, 5);
        let outcome = poller.next_outcome(|| true).await.unwrap();
        assert_eq!(outcome, VerificationState::Verified);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gate_suppresses_network_calls() {
        let gateway = Arc::new(MockMobileVerificationGateway::new());
        gateway.push_state(VerificationState::Verified);

        let poller = StatusPoller::new(gateway.clone(), 5);

        // Gate closed: the poller must outlive several intervals without
        // fetching anything
        let gated = poller.next_outcome(|| false);
        tokio::select! {
            _ = gated => panic!("gated poller must not resolve"),
            _ = tokio::time::sleep(Duration::from_secs(30)) => {}
        }
    }
}
