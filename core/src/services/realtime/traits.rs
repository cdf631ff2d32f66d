//! Event-channel port for the realtime listener.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::errors::FlowResult;
use vf_shared::types::SubjectId;

use super::events::VerificationEvent;

/// Messages delivered by an open channel
#[derive(Debug)]
pub enum ChannelMessage {
    /// A decoded verification event
    Event(VerificationEvent),
    /// The underlying connection dropped; the channel is retrying
    Degraded { attempt: u32 },
    /// The connection was re-established after degradation
    Reconnected,
    /// The channel gave up (retry budget exhausted or server closed)
    Closed,
}

/// Handle to one open channel connection.
///
/// Closing is idempotent and safe from an unmount path; dropping the
/// handle closes the connection.
pub struct ChannelHandle {
    events: mpsc::Receiver<ChannelMessage>,
    stop: Option<oneshot::Sender<()>>,
}

impl ChannelHandle {
    pub fn new(events: mpsc::Receiver<ChannelMessage>, stop: oneshot::Sender<()>) -> Self {
        Self {
            events,
            stop: Some(stop),
        }
    }

    /// Receive the next message; `None` once the channel task has ended
    pub async fn recv(&mut self) -> Option<ChannelMessage> {
        self.events.recv().await
    }

    /// Signal the channel task to stop. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.events.close();
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// Port for opening a push-event connection for one verification subject.
///
/// The subject's token authenticates the connection (carried as a query
/// parameter by the transport; this channel type cannot set headers).
#[async_trait]
pub trait EventChannel: Send + Sync {
    async fn open(&self, subject: &SubjectId) -> FlowResult<ChannelHandle>;
}
