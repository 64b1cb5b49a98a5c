//! Continuous listening pipeline.
//!
//! A capture thread and a recognition thread connected by a bounded
//! frame queue; drop-oldest on overflow so capture never stalls.

pub mod listener;
pub mod types;

pub use listener::{ListenerConfig, ListenerEvent, ListenerHandle};
pub use types::{AudioFrame, TranscriptEvent, TranscriptLog};
