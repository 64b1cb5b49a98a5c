//! Speech output seam: the trait the session speaks through, the
//! cancellable handle it gets back, and a scripted mock.

use crate::error::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Handle to one in-flight utterance.
///
/// Clones share state, so a barge-in watcher can cancel from another
/// thread while the session waits on its own clone.
#[derive(Debug, Clone, Default)]
pub struct SpeakHandle {
    cancelled: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl SpeakHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle for playback that already completed (or was skipped).
    pub fn completed() -> Self {
        let handle = Self::new();
        handle.mark_finished();
        handle
    }

    /// Requests immediate stop. Safe to call from any thread, any
    /// number of times.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Whether playback ran to its natural end.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Whether the utterance is over, by completion or cancellation.
    pub fn is_done(&self) -> bool {
        self.is_finished() || self.is_cancelled()
    }

    /// Marks natural completion. Called by playback, not by consumers.
    pub fn mark_finished(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }

    /// Blocks until the utterance is done.
    pub fn wait(&self) {
        while !self.is_done() {
            std::thread::sleep(Duration::from_millis(10));
        }
    }
}

/// Synthesizes and plays spoken responses.
pub trait SpeechOutput: Send {
    /// Starts speaking `text` and returns immediately with a handle.
    ///
    /// Synthesis and playback failures must not propagate here once the
    /// handle is returned: implementations log and mark the handle
    /// finished so the session keeps running.
    fn speak(&mut self, text: &str) -> Result<SpeakHandle>;
}

/// Speech output that records utterances instead of playing them.
pub struct MockSpeech {
    spoken: Arc<std::sync::Mutex<Vec<String>>>,
    handles: Arc<std::sync::Mutex<Vec<SpeakHandle>>>,
    manual_completion: bool,
    should_fail: bool,
}

impl MockSpeech {
    pub fn new() -> Self {
        Self {
            spoken: Arc::new(std::sync::Mutex::new(Vec::new())),
            handles: Arc::new(std::sync::Mutex::new(Vec::new())),
            manual_completion: false,
            should_fail: false,
        }
    }

    /// Handles stay unfinished until the test completes or cancels them.
    pub fn with_manual_completion(mut self) -> Self {
        self.manual_completion = true;
        self
    }

    /// Every `speak` call fails.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Utterances spoken so far, in call order.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn speak_count(&self) -> usize {
        self.spoken.lock().unwrap().len()
    }

    /// Handle issued for the most recent utterance.
    pub fn last_handle(&self) -> Option<SpeakHandle> {
        self.handles.lock().unwrap().last().cloned()
    }

    /// Shared view of the spoken log, for assertions after the mock has
    /// been moved into a session.
    pub fn spoken_log(&self) -> Arc<std::sync::Mutex<Vec<String>>> {
        Arc::clone(&self.spoken)
    }

    /// Shared view of the issued handles.
    pub fn handle_log(&self) -> Arc<std::sync::Mutex<Vec<SpeakHandle>>> {
        Arc::clone(&self.handles)
    }
}

impl Default for MockSpeech {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechOutput for MockSpeech {
    fn speak(&mut self, text: &str) -> Result<SpeakHandle> {
        if self.should_fail {
            return Err(crate::error::AryaError::SynthesisFailure {
                message: "mock synthesis failure".to_string(),
            });
        }
        self.spoken.lock().unwrap().push(text.to_string());
        let handle = if self.manual_completion {
            SpeakHandle::new()
        } else {
            SpeakHandle::completed()
        };
        self.handles.lock().unwrap().push(handle.clone());
        Ok(handle)
    }
}
