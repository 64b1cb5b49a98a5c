//! Default configuration constants for aryavoice.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

use std::time::Duration;

/// Default audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and provides a good balance
/// between quality and computational efficiency for voice applications.
pub const SAMPLE_RATE: u32 = 16000;

/// Default capture frame size in samples.
///
/// 8000 samples is half a second at 16kHz — large enough to keep the
/// recognizer request rate low, small enough for sub-second wake latency.
pub const FRAME_SAMPLES: usize = 8000;

/// Wake phrases recognized out of the box.
pub const WAKE_PHRASES: &[&str] = &["arya", "arya chat bot", "hello"];

/// Default active-window ceiling in seconds.
///
/// After a wake phrase the session stays "hot" for at most this long before
/// dropping back to passive listening. Bounds false-trigger exposure.
pub const WINDOW_CEILING_SECS: u64 = 300;

/// Default per-utterance listen duration in seconds.
pub const LISTEN_SECS: f32 = 5.0;

/// A first listen result longer than this many characters skips the retry
/// window — the user has clearly already asked something.
pub const LISTEN_RETRY_MAX_CHARS: usize = 8;

/// Minimum ASCII alnum/punctuation ratio for a transcript to count as English.
///
/// Transcripts below this are treated as recognizer noise and discarded.
pub const ENGLISH_RATIO_THRESHOLD: f32 = 0.8;

/// RMS energy threshold (0.0 to 1.0) above which a frame counts as speech.
///
/// Tuned for typical microphone input levels; filters ambient noise while
/// staying sensitive to quiet speakers.
pub const SPEECH_THRESHOLD: f32 = 0.02;

/// Silence duration in milliseconds that closes an open speech segment.
///
/// 1200ms allows for natural pauses without prematurely finalizing.
pub const SILENCE_DURATION_MS: u32 = 1200;

/// Interval in milliseconds between partial hypotheses while a segment is open.
pub const PARTIAL_INTERVAL_MS: u32 = 1000;

/// Minimum speech duration in milliseconds for a segment to be decoded at all.
///
/// Shorter bursts are clicks and thumps, not words.
pub const MIN_SPEECH_MS: u32 = 300;

/// Maximum open-segment duration in milliseconds before a forced finalize.
pub const MAX_SEGMENT_MS: u32 = 15_000;

/// Bounded capacity of the capture-to-consumer frame queue.
///
/// At the default frame size this buffers about four seconds of audio.
/// On overflow the oldest frame is dropped; the producer never blocks.
pub const FRAME_QUEUE_CAPACITY: usize = 8;

/// Default retrieval depth.
pub const TOP_K: usize = 5;

/// Default language code for cloud recognition.
pub const STT_LANGUAGE: &str = "en-US";

/// Default language code for speech synthesis.
pub const TTS_LANGUAGE: &str = "en";

/// Settle pause after a completed playback before the next listen window.
pub const POST_SPEECH_PAUSE: Duration = Duration::from_millis(500);

/// Greeting spoken when a wake phrase is detected.
pub const GREETING: &str = "Hello, my name is Arya Chatbot. I'm ready to answer your questions!";

/// Re-prompt spoken when a listen window produced no usable utterance.
pub const REPROMPT: &str = "I didn't hear a question. Please ask again or say 'exit' to quit.";

/// Farewell spoken on an exit keyword.
pub const FAREWELL: &str = "Goodbye!";

/// Announcement when the active window times out back to passive listening.
pub const WINDOW_ENDED: &str = "I'll go back to sleep now. Say my name when you need me.";

/// Fallback answer when retrieval produced no usable hit.
pub const NO_ANSWER: &str = "I could not find an answer.";

/// Utterances that end the voice session.
pub const VOICE_EXIT_KEYWORDS: &[&str] = &["exit", "quit", "bye"];

/// Inputs that end the text chat loop.
pub const CHAT_EXIT_KEYWORDS: &[&str] = &["exit", "quit", "q"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_size_is_half_a_second() {
        assert_eq!(FRAME_SAMPLES as u32 * 2, SAMPLE_RATE);
    }

    #[test]
    fn wake_phrases_are_normalized() {
        for phrase in WAKE_PHRASES {
            assert_eq!(*phrase, phrase.to_lowercase());
            assert!(!phrase.contains("  "));
        }
    }
}
