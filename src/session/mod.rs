//! Voice session: wake detection, the active Q&A window, and barge-in.

mod barge_in;
mod voice;

pub use barge_in::BargeIn;
pub use voice::{SessionConfig, SessionState, VoiceSession};
