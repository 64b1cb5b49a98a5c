//! Data types for the continuous audio pipeline.

use std::time::Instant;

/// A frame of raw audio samples with timing information.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// PCM samples (16-bit signed integers).
    pub samples: Vec<i16>,
    /// Timestamp when this frame was captured.
    pub timestamp: Instant,
    /// Sequence number for ordering and gap detection.
    pub sequence: u64,
}

impl AudioFrame {
    /// Creates a new audio frame.
    pub fn new(samples: Vec<i16>, timestamp: Instant, sequence: u64) -> Self {
        Self {
            samples,
            timestamp,
            sequence,
        }
    }
}

/// A recognition hypothesis emitted by the streaming recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// Provisional hypothesis for in-progress audio; revised or cleared later.
    Partial(String),
    /// Committed result for a completed utterance segment.
    Final(String),
}

impl TranscriptEvent {
    /// The hypothesis text, regardless of variant.
    pub fn text(&self) -> &str {
        match self {
            TranscriptEvent::Partial(text) | TranscriptEvent::Final(text) => text,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, TranscriptEvent::Final(_))
    }
}

/// The running transcript of one listening cycle.
///
/// Finals append to an ordered log; the current partial is overwritten by
/// the next partial and cleared by a final. The log only grows within a
/// cycle — callers reset it when a new cycle begins.
#[derive(Debug, Clone, Default)]
pub struct TranscriptLog {
    finals: Vec<String>,
    partial: Option<String>,
}

impl TranscriptLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a transcript event into the log.
    pub fn apply(&mut self, event: &TranscriptEvent) {
        match event {
            TranscriptEvent::Partial(text) => {
                self.partial = Some(text.clone());
            }
            TranscriptEvent::Final(text) => {
                if !text.trim().is_empty() {
                    self.finals.push(text.clone());
                }
                self.partial = None;
            }
        }
    }

    /// The committed log concatenated with the current partial.
    ///
    /// This is what the phrase matcher sees, so a wake phrase caught
    /// mid-utterance triggers without waiting for a final boundary.
    pub fn snapshot(&self) -> String {
        let mut parts: Vec<&str> = self.finals.iter().map(String::as_str).collect();
        if let Some(partial) = &self.partial {
            parts.push(partial);
        }
        parts.join(" ")
    }

    /// The last committed final, if any.
    pub fn last_final(&self) -> Option<&str> {
        self.finals.last().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.finals.is_empty() && self.partial.is_none()
    }

    /// Starts a fresh listening cycle.
    pub fn clear(&mut self) {
        self.finals.clear();
        self.partial = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_frame_creation() {
        let samples = vec![100, 200, 300];
        let timestamp = Instant::now();
        let sequence = 42;

        let frame = AudioFrame::new(samples.clone(), timestamp, sequence);

        assert_eq!(frame.samples, samples);
        assert_eq!(frame.timestamp, timestamp);
        assert_eq!(frame.sequence, sequence);
    }

    #[test]
    fn test_transcript_event_accessors() {
        let partial = TranscriptEvent::Partial("hel".to_string());
        let final_event = TranscriptEvent::Final("hello".to_string());

        assert_eq!(partial.text(), "hel");
        assert!(!partial.is_final());
        assert_eq!(final_event.text(), "hello");
        assert!(final_event.is_final());
    }

    #[test]
    fn test_log_partial_is_overwritten_by_next_partial() {
        let mut log = TranscriptLog::new();
        log.apply(&TranscriptEvent::Partial("he".to_string()));
        log.apply(&TranscriptEvent::Partial("hey ar".to_string()));

        assert_eq!(log.snapshot(), "hey ar");
    }

    #[test]
    fn test_log_final_clears_partial_and_appends() {
        let mut log = TranscriptLog::new();
        log.apply(&TranscriptEvent::Partial("hey ar".to_string()));
        log.apply(&TranscriptEvent::Final("hey arya".to_string()));

        assert_eq!(log.snapshot(), "hey arya");
        assert_eq!(log.last_final(), Some("hey arya"));

        // A new partial extends the snapshot but not the committed log
        log.apply(&TranscriptEvent::Partial("what is".to_string()));
        assert_eq!(log.snapshot(), "hey arya what is");
        assert_eq!(log.last_final(), Some("hey arya"));
    }

    #[test]
    fn test_log_grows_monotonically_across_finals() {
        let mut log = TranscriptLog::new();
        log.apply(&TranscriptEvent::Final("one".to_string()));
        log.apply(&TranscriptEvent::Final("two".to_string()));
        log.apply(&TranscriptEvent::Final("three".to_string()));

        assert_eq!(log.snapshot(), "one two three");
    }

    #[test]
    fn test_log_ignores_blank_finals() {
        let mut log = TranscriptLog::new();
        log.apply(&TranscriptEvent::Partial("mumble".to_string()));
        log.apply(&TranscriptEvent::Final("   ".to_string()));

        // Blank final still clears the partial
        assert!(log.is_empty());
        assert_eq!(log.snapshot(), "");
    }

    #[test]
    fn test_log_clear_starts_fresh_cycle() {
        let mut log = TranscriptLog::new();
        log.apply(&TranscriptEvent::Final("hello arya".to_string()));
        assert!(!log.is_empty());

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.snapshot(), "");
        assert_eq!(log.last_final(), None);
    }
}
