//! aryavoice - Wake-phrase voice assistant for college placement Q&A
//!
//! Streams microphone audio through a wake-phrase detector, answers
//! spoken questions from a local retrieval index, and speaks the
//! answers back with barge-in interruption. A text chat surface shares
//! the same index.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod audio;
pub mod chat;
#[cfg(feature = "cli")]
pub mod cli;
pub mod clock;
pub mod config;
pub mod defaults;
pub mod error;
pub mod pipeline;
pub mod retrieval;
pub mod session;
pub mod stt;
pub mod text;
pub mod tts;

// Core traits (capture → recognize → retrieve → speak)
pub use audio::AudioSource;
pub use retrieval::Retriever;
pub use stt::Transcriber;
pub use tts::SpeechOutput;

// Session machinery
pub use session::{BargeIn, SessionConfig, SessionState, VoiceSession};

// Error handling
pub use error::{AryaError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.3.1+abc1234"` when git hash is available, `"0.3.1"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
