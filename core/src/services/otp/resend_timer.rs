//! Monotonic countdown gating "resend code" actions.

use tokio::time::{Duration, Instant};

/// Cooldown timer for resend actions.
///
/// Backed by the runtime's monotonic clock, so wall-clock changes never
/// shorten or lengthen the interval, and paused-time tests are exact.
#[derive(Debug, Clone)]
pub struct ResendTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl ResendTimer {
    /// Create a stopped timer with the given interval. Resend is available
    /// until the first `start`.
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs),
            deadline: None,
        }
    }

    /// Create and immediately start the timer (a code was just sent)
    pub fn started(interval_secs: u64) -> Self {
        let mut timer = Self::new(interval_secs);
        timer.start();
        timer
    }

    /// Begin (or restart) the full cooldown interval
    pub fn start(&mut self) {
        self.deadline = Some(Instant::now() + self.interval);
    }

    /// Restart the full interval, optionally with a server-provided
    /// cooldown that overrides the configured one
    pub fn restart_with(&mut self, cooldown_secs: Option<u64>) {
        if let Some(secs) = cooldown_secs {
            self.interval = Duration::from_secs(secs);
        }
        self.start();
    }

    /// Stop the countdown; resend becomes available
    pub fn clear(&mut self) {
        self.deadline = None;
    }

    /// Whether a resend is allowed right now
    pub fn is_resend_available(&self) -> bool {
        match self.deadline {
            None => true,
            Some(deadline) => Instant::now() >= deadline,
        }
    }

    /// Whole seconds until resend becomes available (rounded up), zero if
    /// available now
    pub fn remaining_secs(&self) -> u64 {
        match self.deadline {
            None => 0,
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                let secs = remaining.as_secs();
                if remaining.subsec_nanos() > 0 {
                    secs + 1
                } else {
                    secs
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_immediately_after_start() {
        let timer = ResendTimer::started(60);
        assert!(!timer.is_resend_available());
        assert_eq!(timer.remaining_secs(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_available_only_after_whole_interval() {
        let timer = ResendTimer::started(60);

        advance(Duration::from_secs(59)).await;
        assert!(!timer.is_resend_available());
        assert_eq!(timer.remaining_secs(), 1);

        advance(Duration::from_secs(1)).await;
        assert!(timer.is_resend_available());
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_restarts_full_interval() {
        let mut timer = ResendTimer::started(60);

        advance(Duration::from_secs(45)).await;
        timer.start();

        advance(Duration::from_secs(59)).await;
        assert!(!timer.is_resend_available());

        advance(Duration::from_secs(1)).await;
        assert!(timer.is_resend_available());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_timer_is_available() {
        let mut timer = ResendTimer::new(60);
        assert!(timer.is_resend_available());

        timer.start();
        assert!(!timer.is_resend_available());

        timer.clear();
        assert!(timer.is_resend_available());
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_cooldown_overrides_interval() {
        let mut timer = ResendTimer::started(60);
        timer.restart_with(Some(30));

        advance(Duration::from_secs(30)).await;
        assert!(timer.is_resend_available());
    }
}
