//! Server-sent-events channel for realtime verification.

pub mod channel;
pub mod parser;

pub use channel::SseEventChannel;
pub use parser::{SseFrame, SseParser};
