//! Realtime listener state machine.

use std::sync::Arc;
use tracing;

use crate::errors::FlowResult;
use vf_shared::types::SubjectId;

use super::events::VerificationEvent;
use super::traits::{ChannelHandle, ChannelMessage, EventChannel};

/// Listener lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Idle,
    Connecting,
    Open,
    Disconnected,
}

/// Watches one pending verification over a push channel.
///
/// Terminal events (`verified`, `expired`) self-disconnect the listener;
/// anything still buffered on that connection is discarded. Transient
/// connection loss is surfaced as a degraded flag, the underlying channel
/// retries on its own, and the listener itself never falls back to
/// polling.
pub struct RealtimeListener<C: EventChannel> {
    channel: Arc<C>,
    state: ListenerState,
    degraded: bool,
    handle: Option<ChannelHandle>,
}

impl<C: EventChannel> RealtimeListener<C> {
    pub fn new(channel: Arc<C>) -> Self {
        Self {
            channel,
            state: ListenerState::Idle,
            degraded: false,
            handle: None,
        }
    }

    /// Open a connection for a verification subject. Any prior connection
    /// is torn down first: a new attempt always supersedes the old one.
    pub async fn connect(&mut self, subject: &SubjectId) -> FlowResult<()> {
        self.disconnect();
        self.state = ListenerState::Connecting;
        match self.channel.open(subject).await {
            Ok(handle) => {
                self.handle = Some(handle);
                self.state = ListenerState::Open;
                self.degraded = false;
                tracing::debug!(
                    subject = %subject,
                    event = "listener_connected",
                    "Realtime verification channel open"
                );
                Ok(())
            }
            Err(error) => {
                self.state = ListenerState::Disconnected;
                Err(error)
            }
        }
    }

    /// Next verification event, or `None` once the connection has ended.
    ///
    /// After a terminal event this returns that event, disconnects, and
    /// every subsequent call returns `None` without touching the old
    /// connection's buffer.
    pub async fn next_event(&mut self) -> Option<VerificationEvent> {
        loop {
            let handle = self.handle.as_mut()?;
            match handle.recv().await {
                Some(ChannelMessage::Event(event)) => {
                    if event.kind.is_terminal() {
                        tracing::debug!(
                            kind = ?event.kind,
                            event = "listener_terminal_event",
                            "Terminal verification event; disconnecting"
                        );
                        self.disconnect();
                    }
                    return Some(event);
                }
                Some(ChannelMessage::Degraded { attempt }) => {
                    self.degraded = true;
                    tracing::warn!(
                        attempt,
                        event = "listener_degraded",
                        "Realtime channel degraded; channel is retrying"
                    );
                }
                Some(ChannelMessage::Reconnected) => {
                    self.degraded = false;
                }
                Some(ChannelMessage::Closed) | None => {
                    self.disconnect();
                    return None;
                }
            }
        }
    }

    /// Tear down the connection. Idempotent; safe from an unmount path
    /// with no pending state.
    pub fn disconnect(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.close();
            self.state = ListenerState::Disconnected;
        } else if self.state != ListenerState::Idle {
            self.state = ListenerState::Disconnected;
        }
        self.degraded = false;
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ListenerState::Open
    }

    /// Whether the channel is currently retrying after a transient loss.
    /// Callers gate their polling fallback on this and on
    /// [`is_connected`](Self::is_connected).
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

impl<C: EventChannel> Drop for RealtimeListener<C> {
    fn drop(&mut self) {
        self.disconnect();
    }
}
