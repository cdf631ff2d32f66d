//! Mobile verification flow: composes the realtime listener, the OTP
//! unit, and the polling fallback over one verification session.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing;

use crate::domain::entities::verification_session::{
    VerificationMethod, VerificationSession, VerificationState,
};
use crate::errors::{FlowResult, ValidationError};
use crate::gateways::mobile::MobileVerificationGateway;
use crate::gateways::types::{InitiateMobileVerification, MobileVerificationStatus, ResendReceipt};
use crate::services::otp::{OtpChallenge, OtpConfig, OtpSubmitter};
use crate::services::realtime::{EventChannel, RealtimeListener, VerificationEventKind};
use vf_shared::types::SubjectId;
use vf_shared::utils::contact::is_valid_phone;

/// Binds the OTP unit to the mobile verification endpoints
struct MobileOtpSubmitter<G: MobileVerificationGateway> {
    gateway: Arc<G>,
}

#[async_trait]
impl<G: MobileVerificationGateway> OtpSubmitter for MobileOtpSubmitter<G> {
    type Artifact = MobileVerificationStatus;

    async fn submit(&self, code: &str) -> FlowResult<MobileVerificationStatus> {
        self.gateway.verify_otp(code).await
    }

    async fn resend(&self) -> FlowResult<ResendReceipt> {
        self.gateway.resend().await
    }
}

/// Drives one mobile verification attempt to an outcome.
///
/// The OTP input and the push channel legitimately race for the same
/// logical outcome (a user who receives the SMS code and also completes
/// the scan): whichever resolves first wins, and the loser's later
/// resolution is ignored because the recorded outcome sticks.
pub struct MobileVerificationFlow<G: MobileVerificationGateway, C: EventChannel> {
    gateway: Arc<G>,
    listener: RealtimeListener<C>,
    session: Option<VerificationSession>,
    unit: Option<OtpChallenge<MobileOtpSubmitter<G>>>,
    outcome: Option<VerificationState>,
    poll_interval: Duration,
    error: Option<String>,
}

impl<G: MobileVerificationGateway, C: EventChannel> MobileVerificationFlow<G, C> {
    pub fn new(gateway: Arc<G>, channel: Arc<C>, poll_interval_secs: u64) -> Self {
        Self {
            gateway,
            listener: RealtimeListener::new(channel),
            session: None,
            unit: None,
            outcome: None,
            poll_interval: Duration::from_secs(poll_interval_secs),
            error: None,
        }
    }

    pub fn session(&self) -> Option<&VerificationSession> {
        self.session.as_ref()
    }

    pub fn outcome(&self) -> Option<VerificationState> {
        self.outcome
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the push channel is currently open
    pub fn is_channel_connected(&self) -> bool {
        self.listener.is_connected()
    }

    /// Start a verification attempt. Any prior session is superseded: its
    /// channel is torn down and its outcome forgotten.
    pub async fn initiate(
        &mut self,
        method: VerificationMethod,
        phone: Option<&str>,
        phone_country: Option<&str>,
    ) -> FlowResult<VerificationSession> {
        if let Some(phone) = phone {
            if !is_valid_phone(phone) {
                return Err(ValidationError::InvalidPhoneFormat {
                    phone: vf_shared::utils::contact::mask_phone_number(phone),
                }
                .into());
            }
        }

        self.listener.disconnect();
        self.outcome = None;
        self.error = None;

        let session = self
            .gateway
            .initiate(InitiateMobileVerification {
                method,
                phone: phone.map(str::to_string),
                phone_country: phone_country.map(str::to_string),
            })
            .await?;

        tracing::info!(
            method = ?method,
            event = "mobile_verification_initiated",
            "Mobile verification session opened"
        );

        match method {
            VerificationMethod::Whatsapp => {
                // Externally-triggered: watch the push channel. A failed
                // connect is non-fatal; the poller covers it.
                let subject = SubjectId::new(session.verification_token.clone());
                if let Err(error) = self.listener.connect(&subject).await {
                    if error.is_fatal() {
                        return Err(error);
                    }
                    tracing::warn!(
                        error = %error,
                        event = "mobile_channel_unavailable",
                        "Push channel unavailable; polling only"
                    );
                }
                self.unit = None;
            }
            VerificationMethod::Sms => {
                self.unit = Some(OtpChallenge::new(
                    Arc::new(MobileOtpSubmitter {
                        gateway: Arc::clone(&self.gateway),
                    }),
                    OtpConfig::identity(),
                ));
            }
        }

        self.session = Some(session.clone());
        Ok(session)
    }

    /// Enter one SMS-code digit. A verified outcome recorded by the push
    /// channel first wins; later code resolutions are ignored.
    pub async fn push_digit(&mut self, digit: char) -> FlowResult<Option<VerificationState>> {
        if self.outcome.is_some() {
            return Ok(self.outcome);
        }
        let Some(unit) = self.unit.as_mut() else {
            return Ok(None);
        };
        match unit.push_digit(digit).await? {
            Some(status) => Ok(self.record(status.state)),
            None => Ok(None),
        }
    }

    /// Resend the SMS code, gated by the cooldown
    pub async fn resend(&mut self) -> FlowResult<bool> {
        match self.unit.as_mut() {
            Some(unit) => unit.resend().await,
            None => {
                self.gateway.resend().await?;
                Ok(true)
            }
        }
    }

    /// Wait for the next outcome signal from whichever source resolves
    /// first: the push channel while it is up, the status poll while it
    /// is not.
    ///
    /// Returns `Verified`/`Expired` as sticky terminal outcomes; `Failed`
    /// is surfaced for inline display and the attempt keeps running if
    /// called again.
    pub async fn await_outcome(&mut self) -> FlowResult<VerificationState> {
        if let Some(outcome) = self.outcome {
            return Ok(outcome);
        }

        let mut poll = interval(self.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        poll.tick().await; // the first tick fires immediately

        loop {
            if self.listener.is_connected() {
                tokio::select! {
                    event = self.listener.next_event() => {
                        let Some(event) = event else {
                            // Channel ended without a terminal event;
                            // polling takes over on the next iteration
                            continue;
                        };
                        match event.kind {
                            VerificationEventKind::Verified => {
                                return Ok(self.record(VerificationState::Verified).unwrap_or(VerificationState::Verified));
                            }
                            VerificationEventKind::Expired => {
                                return Ok(self.record(VerificationState::Expired).unwrap_or(VerificationState::Expired));
                            }
                            VerificationEventKind::Failed => {
                                self.error = event.message.clone();
                                return Ok(VerificationState::Failed);
                            }
                            VerificationEventKind::Initiated => {}
                        }
                    }
                    _ = poll.tick() => {}
                }
            } else {
                poll.tick().await;
                match self.gateway.status().await {
                    Ok(status) if status.state != VerificationState::Pending => {
                        if status.state.is_terminal() {
                            return Ok(self
                                .record(status.state)
                                .unwrap_or(status.state));
                        }
                        return Ok(status.state);
                    }
                    Ok(_) => {}
                    Err(error) if error.is_fatal() => return Err(error),
                    Err(error) => {
                        tracing::warn!(
                            error = %error,
                            event = "mobile_status_poll_failed",
                            "Status poll failed; retrying"
                        );
                    }
                }
            }
        }
    }

    /// Tear down timers and channels; safe from an unmount path
    pub fn dispose(&mut self) {
        self.listener.disconnect();
        self.unit = None;
    }

    /// Record a terminal outcome once; later resolutions lose the race
    fn record(&mut self, state: VerificationState) -> Option<VerificationState> {
        if self.outcome.is_none() {
            self.outcome = Some(state);
            self.listener.disconnect();
            tracing::info!(
                state = ?state,
                event = "mobile_verification_outcome",
                "Mobile verification reached an outcome"
            );
        }
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FlowError;
    use crate::gateways::mobile::MockMobileVerificationGateway;
    use crate::services::realtime::{ChannelHandle, ChannelMessage, VerificationEvent};
    use chrono::Utc;
    use std::sync::Mutex;
    use tokio::sync::{mpsc, oneshot};

    struct ScriptedChannel {
        script: Mutex<Vec<ChannelMessage>>,
        senders: Mutex<Vec<mpsc::Sender<ChannelMessage>>>,
        fail_open: bool,
    }

    impl ScriptedChannel {
        fn new(script: Vec<ChannelMessage>) -> Self {
            Self {
                script: Mutex::new(script),
                senders: Mutex::new(Vec::new()),
                fail_open: false,
            }
        }

        fn unavailable() -> Self {
            Self {
                script: Mutex::new(Vec::new()),
                senders: Mutex::new(Vec::new()),
                fail_open: true,
            }
        }
    }

    #[async_trait]
    impl EventChannel for ScriptedChannel {
        async fn open(&self, _subject: &SubjectId) -> FlowResult<ChannelHandle> {
            if self.fail_open {
                return Err(crate::errors::ChannelError::Closed.into());
            }
            let (tx, rx) = mpsc::channel(16);
            let (stop_tx, _stop_rx) = oneshot::channel();
            for message in self.script.lock().unwrap().drain(..) {
                tx.try_send(message).expect("script fits the buffer");
            }
            self.senders.lock().unwrap().push(tx);
            Ok(ChannelHandle::new(rx, stop_tx))
        }
    }

    fn event(kind: VerificationEventKind) -> ChannelMessage {
        ChannelMessage::Event(VerificationEvent {
            kind,
            subject_id: SubjectId::new("vt-mock-1"),
            message: None,
            timestamp: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_whatsapp_outcome_arrives_over_the_channel() {
        let gateway = Arc::new(MockMobileVerificationGateway::new());
        let channel = Arc::new(ScriptedChannel::new(vec![
            event(VerificationEventKind::Initiated),
            event(VerificationEventKind::Verified),
        ]));
        let mut flow = MobileVerificationFlow::new(gateway, channel, 5);

        flow.initiate(VerificationMethod::Whatsapp, None, None)
            .await
            .unwrap();
        assert!(flow.is_channel_connected());

        let outcome = flow.await_outcome().await.unwrap();
        assert_eq!(outcome, VerificationState::Verified);
        assert!(!flow.is_channel_connected());
        assert_eq!(flow.outcome(), Some(VerificationState::Verified));
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_covers_an_unavailable_channel() {
        let gateway = Arc::new(MockMobileVerificationGateway::new());
        gateway.push_state(VerificationState::Pending);
        gateway.push_state(VerificationState::Verified);
        let channel = Arc::new(ScriptedChannel::unavailable());
        let mut flow = MobileVerificationFlow::new(gateway, channel, 5);

        flow.initiate(VerificationMethod::Whatsapp, None, None)
            .await
            .unwrap();
        assert!(!flow.is_channel_connected());

        let outcome = flow.await_outcome().await.unwrap();
        assert_eq!(outcome, VerificationState::Verified);
    }

    #[tokio::test]
    async fn test_sms_code_path_records_outcome() {
        let gateway = Arc::new(MockMobileVerificationGateway::new());
        let channel = Arc::new(ScriptedChannel::new(vec![]));
        let mut flow = MobileVerificationFlow::new(gateway.clone(), channel, 5);

        flow.initiate(VerificationMethod::Sms, Some("+61412345678"), Some("AU"))
            .await
            .unwrap();

        let mut outcome = None;
        for digit in "123456".chars() {
            if let Some(state) = flow.push_digit(digit).await.unwrap() {
                outcome = Some(state);
            }
        }
        assert_eq!(outcome, Some(VerificationState::Verified));
        assert_eq!(gateway.submitted_codes(), vec!["123456"]);

        // The recorded outcome sticks; further input is ignored
        assert_eq!(
            flow.push_digit('1').await.unwrap(),
            Some(VerificationState::Verified)
        );
        assert_eq!(gateway.submitted_codes().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_phone_fails_before_any_network_call() {
        let gateway = Arc::new(MockMobileVerificationGateway::new());
        let channel = Arc::new(ScriptedChannel::new(vec![]));
        let mut flow = MobileVerificationFlow::new(gateway.clone(), channel, 5);

        let result = flow
            .initiate(VerificationMethod::Sms, Some("12"), None)
            .await;
        assert!(matches!(
            result,
            Err(FlowError::Validation(ValidationError::InvalidPhoneFormat { .. }))
        ));
        assert_eq!(gateway.initiate_count(), 0);
    }

    #[tokio::test]
    async fn test_new_initiation_supersedes_prior_session() {
        let gateway = Arc::new(MockMobileVerificationGateway::new());
        let channel = Arc::new(ScriptedChannel::new(vec![event(
            VerificationEventKind::Verified,
        )]));
        let mut flow = MobileVerificationFlow::new(gateway.clone(), channel.clone(), 5);

        flow.initiate(VerificationMethod::Whatsapp, None, None)
            .await
            .unwrap();
        let outcome = flow.await_outcome().await.unwrap();
        assert_eq!(outcome, VerificationState::Verified);

        // Re-initiating forgets the prior outcome and reconnects
        channel
            .script
            .lock()
            .unwrap()
            .push(event(VerificationEventKind::Expired));
        flow.initiate(VerificationMethod::Whatsapp, None, None)
            .await
            .unwrap();
        assert_eq!(flow.outcome(), None);
        assert_eq!(gateway.initiate_count(), 2);

        let outcome = flow.await_outcome().await.unwrap();
        assert_eq!(outcome, VerificationState::Expired);
    }

    #[tokio::test]
    async fn test_failed_event_surfaces_without_ending_the_attempt() {
        let gateway = Arc::new(MockMobileVerificationGateway::new());
        let channel = Arc::new(ScriptedChannel::new(vec![
            event(VerificationEventKind::Failed),
            event(VerificationEventKind::Verified),
        ]));
        let mut flow = MobileVerificationFlow::new(gateway, channel, 5);

        flow.initiate(VerificationMethod::Whatsapp, None, None)
            .await
            .unwrap();

        let first = flow.await_outcome().await.unwrap();
        assert_eq!(first, VerificationState::Failed);
        assert_eq!(flow.outcome(), None);

        let second = flow.await_outcome().await.unwrap();
        assert_eq!(second, VerificationState::Verified);
    }
}
