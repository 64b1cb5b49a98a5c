use crate::error::{AryaError, Result};
use std::sync::Arc;
use std::sync::Mutex;

/// Trait for speech-to-text transcription.
///
/// This trait allows swapping implementations (cloud backend vs mock).
pub trait Transcriber: Send + Sync {
    /// Transcribe audio samples to text.
    ///
    /// # Arguments
    /// * `audio` - Audio samples as 16-bit PCM mono
    ///
    /// # Returns
    /// Transcribed text (possibly empty) or error
    fn transcribe(&self, audio: &[i16]) -> Result<String>;

    /// Get the name of the recognition backend
    fn backend_name(&self) -> &str;

    /// Check if the transcriber is ready
    fn is_ready(&self) -> bool;
}

/// Implement Transcriber for Arc<T> to allow sharing across sessions.
impl<T: Transcriber> Transcriber for Arc<T> {
    fn transcribe(&self, audio: &[i16]) -> Result<String> {
        (**self).transcribe(audio)
    }

    fn backend_name(&self) -> &str {
        (**self).backend_name()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Mock transcriber for testing.
///
/// Returns scripted responses in order, repeating the last one once the
/// script is exhausted. Tracks how many times it was called.
#[derive(Debug)]
pub struct MockTranscriber {
    backend_name: String,
    responses: Mutex<Vec<String>>,
    next_response: Mutex<usize>,
    calls: Mutex<u32>,
    should_fail: bool,
    fail_requests: bool,
}

impl MockTranscriber {
    /// Create a new mock transcriber with default settings
    pub fn new(backend_name: &str) -> Self {
        Self {
            backend_name: backend_name.to_string(),
            responses: Mutex::new(vec!["mock transcription".to_string()]),
            next_response: Mutex::new(0),
            calls: Mutex::new(0),
            should_fail: false,
            fail_requests: false,
        }
    }

    /// Configure the mock to return a specific response
    pub fn with_response(self, response: &str) -> Self {
        *self.responses.lock().unwrap() = vec![response.to_string()];
        *self.next_response.lock().unwrap() = 0;
        self
    }

    /// Configure the mock to return a sequence of responses.
    ///
    /// The last response repeats once the script runs out.
    pub fn with_responses(self, responses: &[&str]) -> Self {
        *self.responses.lock().unwrap() = responses.iter().map(|r| r.to_string()).collect();
        *self.next_response.lock().unwrap() = 0;
        self
    }

    /// Configure the mock to fail on transcribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the mock to report ready but fail every transcribe call,
    /// like a cloud backend whose network requests fail.
    pub fn with_request_failure(mut self) -> Self {
        self.fail_requests = true;
        self
    }

    /// How many times `transcribe` was called
    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, _audio: &[i16]) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        if self.should_fail || self.fail_requests {
            return Err(AryaError::TranscriptionFailure {
                message: "mock transcription failure".to_string(),
            });
        }
        let responses = self.responses.lock().unwrap();
        let mut next = self.next_response.lock().unwrap();
        let index = (*next).min(responses.len().saturating_sub(1));
        *next += 1;
        Ok(responses.get(index).cloned().unwrap_or_default())
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }

    fn is_ready(&self) -> bool {
        !self.should_fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_transcriber_returns_response() {
        let transcriber = MockTranscriber::new("test-backend").with_response("Hello, this is a test");

        let audio = vec![0i16; 1000];
        let result = transcriber.transcribe(&audio);

        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "Hello, this is a test");
    }

    #[test]
    fn test_mock_transcriber_plays_response_script_then_repeats_last() {
        let transcriber =
            MockTranscriber::new("test-backend").with_responses(&["he", "hey ar", "hey arya"]);

        let audio = vec![0i16; 10];
        assert_eq!(transcriber.transcribe(&audio).unwrap(), "he");
        assert_eq!(transcriber.transcribe(&audio).unwrap(), "hey ar");
        assert_eq!(transcriber.transcribe(&audio).unwrap(), "hey arya");
        assert_eq!(transcriber.transcribe(&audio).unwrap(), "hey arya");
        assert_eq!(transcriber.call_count(), 4);
    }

    #[test]
    fn test_mock_transcriber_returns_error_when_configured() {
        let transcriber = MockTranscriber::new("test-backend").with_failure();

        let audio = vec![0i16; 1000];
        let result = transcriber.transcribe(&audio);

        assert!(result.is_err());
        match result {
            Err(AryaError::TranscriptionFailure { message }) => {
                assert_eq!(message, "mock transcription failure");
            }
            _ => panic!("Expected TranscriptionFailure error"),
        }
    }

    #[test]
    fn test_mock_transcriber_backend_name() {
        let transcriber = MockTranscriber::new("cloud-speech");
        assert_eq!(transcriber.backend_name(), "cloud-speech");
    }

    #[test]
    fn test_mock_transcriber_is_ready() {
        let ready_transcriber = MockTranscriber::new("test-backend");
        assert!(ready_transcriber.is_ready());

        let failing_transcriber = MockTranscriber::new("test-backend").with_failure();
        assert!(!failing_transcriber.is_ready());
    }

    #[test]
    fn test_request_failure_mock_stays_ready_but_errors() {
        let transcriber = MockTranscriber::new("cloud").with_request_failure();
        assert!(transcriber.is_ready());

        let result = transcriber.transcribe(&[0i16; 100]);
        assert!(matches!(
            result,
            Err(AryaError::TranscriptionFailure { .. })
        ));
    }

    #[test]
    fn test_transcriber_trait_is_object_safe() {
        let transcriber: Box<dyn Transcriber> =
            Box::new(MockTranscriber::new("test-backend").with_response("boxed test"));

        assert_eq!(transcriber.backend_name(), "test-backend");
        assert!(transcriber.is_ready());

        let audio = vec![0i16; 100];
        let result = transcriber.transcribe(&audio);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "boxed test");
    }

    #[test]
    fn test_transcriber_shared_through_arc() {
        let transcriber = Arc::new(MockTranscriber::new("shared").with_response("shared result"));

        let audio = vec![0i16; 10];
        assert_eq!(transcriber.transcribe(&audio).unwrap(), "shared result");
        assert_eq!(Arc::clone(&transcriber).transcribe(&audio).unwrap(), "shared result");
        assert_eq!(transcriber.call_count(), 2);
    }

    #[test]
    fn test_mock_transcriber_empty_audio() {
        let transcriber = MockTranscriber::new("test-backend");
        let empty_audio: Vec<i16> = vec![];
        let result = transcriber.transcribe(&empty_audio);
        assert!(result.is_ok());
    }

    #[test]
    fn test_mock_transcriber_large_audio() {
        let transcriber =
            MockTranscriber::new("test-backend").with_response("long audio transcription");

        // Simulate 10 seconds of 16kHz audio
        let audio = vec![0i16; 16000 * 10];
        let result = transcriber.transcribe(&audio);

        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "long audio transcription");
    }
}
