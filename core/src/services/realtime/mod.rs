//! Realtime verification listener.
//!
//! Watches a pending external verification over a push-event channel and
//! exposes terminal outcomes to the composing flow. The listener never
//! polls; callers that need resilience compose it with the
//! [`StatusPoller`] gated on "not connected".

pub mod events;
pub mod listener;
pub mod poller;
pub mod traits;

pub use events::{VerificationEvent, VerificationEventKind};
pub use listener::{ListenerState, RealtimeListener};
pub use poller::StatusPoller;
pub use traits::{ChannelHandle, ChannelMessage, EventChannel};
