//! Flow controller: the top-level state machine per guided process.
//!
//! Derives the active step from authoritative remote status plus a local
//! sub-progress cursor, and serializes step-strategy invocations through
//! an in-flight flag.

pub mod controller;
pub mod progress;
pub mod step;
pub mod strategy;

pub use controller::FlowController;
pub use progress::SubProgress;
pub use step::{derive_step, DerivedStep};
pub use strategy::{StepArtifact, StepSignal};
