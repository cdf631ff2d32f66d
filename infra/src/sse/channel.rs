//! Reconnecting SSE implementation of the realtime event-channel port.

use async_trait::async_trait;
use futures::StreamExt;
use rand::Rng;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing;

use vf_core::errors::{ChannelError, FlowResult};
use vf_core::services::realtime::{ChannelHandle, ChannelMessage, EventChannel, VerificationEvent};
use vf_shared::config::endpoints::EndpointsConfig;
use vf_shared::config::realtime::RealtimeConfig;
use vf_shared::types::SubjectId;

use super::parser::SseParser;

/// Event-channel implementation over `text/event-stream`.
///
/// The verification token travels as a query parameter because this
/// transport cannot set custom headers. Connection loss is handled
/// internally with jittered exponential backoff; the listener only sees
/// `Degraded`/`Reconnected` markers between events.
pub struct SseEventChannel {
    http: reqwest::Client,
    endpoints: EndpointsConfig,
    realtime: RealtimeConfig,
    /// Path segment naming the verification method (`events/{method}`)
    method: String,
}

impl SseEventChannel {
    pub fn new(
        endpoints: EndpointsConfig,
        realtime: RealtimeConfig,
        method: impl Into<String>,
    ) -> FlowResult<Self> {
        let http = reqwest::Client::builder()
            // No request timeout: the stream is long-lived by design
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| vf_core::errors::FlowError::Internal {
                message: format!("failed to build SSE client: {}", e),
            })?;
        Ok(Self {
            http,
            endpoints,
            realtime,
            method: method.into(),
        })
    }
}

#[async_trait]
impl EventChannel for SseEventChannel {
    async fn open(&self, subject: &SubjectId) -> FlowResult<ChannelHandle> {
        let url = self.endpoints.events_url(&self.method, subject.as_str());
        let (tx, rx) = mpsc::channel(32);
        let (stop_tx, stop_rx) = oneshot::channel();

        tokio::spawn(run_connection(
            self.http.clone(),
            url,
            self.realtime.clone(),
            tx,
            stop_rx,
        ));

        Ok(ChannelHandle::new(rx, stop_tx))
    }
}

/// Connection loop: stream frames, reconnect with backoff on loss, stop
/// on request or when the receiver goes away.
async fn run_connection(
    http: reqwest::Client,
    url: String,
    realtime: RealtimeConfig,
    tx: mpsc::Sender<ChannelMessage>,
    mut stop: oneshot::Receiver<()>,
) {
    let mut attempt: u32 = 0;

    loop {
        let outcome = tokio::select! {
            outcome = stream_once(&http, &url, &tx, attempt > 0) => outcome,
            _ = &mut stop => {
                tracing::debug!(event = "sse_stopped", "Channel stop requested");
                return;
            }
        };

        match outcome {
            StreamEnd::ReceiverGone => return,
            StreamEnd::Lost(error) => {
                attempt += 1;
                if realtime.max_reconnect_attempts != 0
                    && attempt >= realtime.max_reconnect_attempts
                {
                    tracing::warn!(
                        attempt,
                        event = "sse_gave_up",
                        "Retry budget exhausted; closing channel"
                    );
                    let _ = tx.send(ChannelMessage::Closed).await;
                    return;
                }
                tracing::warn!(
                    attempt,
                    error = %error,
                    event = "sse_connection_lost",
                    "Event stream lost; reconnecting"
                );
                if tx.send(ChannelMessage::Degraded { attempt }).await.is_err() {
                    return;
                }

                let backoff = realtime.backoff_ms(attempt.saturating_sub(1));
                let jitter = rand::thread_rng().gen_range(0..=backoff / 4 + 1);
                let delay = Duration::from_millis(backoff + jitter);
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = &mut stop => return,
                }
            }
        }
    }
}

enum StreamEnd {
    /// The listener dropped its receiver; nothing left to do
    ReceiverGone,
    /// The connection failed or the server ended the stream
    Lost(anyhow::Error),
}

/// Open the stream once and pump frames until it ends
async fn stream_once(
    http: &reqwest::Client,
    url: &str,
    tx: &mpsc::Sender<ChannelMessage>,
    reconnected: bool,
) -> StreamEnd {
    let response = match http
        .get(url)
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send()
        .await
        .and_then(|response| response.error_for_status())
    {
        Ok(response) => response,
        Err(error) => return StreamEnd::Lost(error.into()),
    };

    if reconnected && tx.send(ChannelMessage::Reconnected).await.is_err() {
        return StreamEnd::ReceiverGone;
    }
    tracing::debug!(event = "sse_open", "Event stream open");

    let mut parser = SseParser::new();
    let mut pending = String::new();
    let mut body = response.bytes_stream();

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(error) => return StreamEnd::Lost(error.into()),
        };
        pending.push_str(&String::from_utf8_lossy(&chunk));

        while let Some(position) = pending.find('\n') {
            let line: String = pending.drain(..=position).collect();
            let line = line.trim_end_matches(&['\n', '\r'][..]);
            if let Some(frame) = parser.push_line(line) {
                let Some(event) = VerificationEvent::decode(&frame.event, &frame.data) else {
                    // Unknown event names are forward-compatible noise
                    tracing::debug!(
                        name = frame.event.as_str(),
                        event = "sse_ignored_event",
                        "Ignoring unrecognized event"
                    );
                    continue;
                };
                if tx.send(ChannelMessage::Event(event)).await.is_err() {
                    return StreamEnd::ReceiverGone;
                }
            }
        }
    }

    StreamEnd::Lost(anyhow::anyhow!(ChannelError::Closed))
}
