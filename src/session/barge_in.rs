//! Barge-in: interrupting spoken answers.
//!
//! One armed slot holds the handle of the utterance currently playing.
//! An interrupt (space or enter on stdin, or a programmatic call)
//! cancels whatever is armed. The slot outlives individual utterances,
//! so a single stdin watcher thread serves the whole session.

use crate::tts::SpeakHandle;
use std::io::BufRead;
use std::sync::{Arc, Mutex};

/// Shared interrupt slot for the utterance being spoken.
#[derive(Clone, Default)]
pub struct BargeIn {
    slot: Arc<Mutex<Option<SpeakHandle>>>,
}

impl BargeIn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the slot with the handle of the utterance now playing.
    pub fn arm(&self, handle: &SpeakHandle) {
        *self.slot.lock().unwrap() = Some(handle.clone());
    }

    /// Clears the slot once the utterance is over.
    pub fn disarm(&self) {
        *self.slot.lock().unwrap() = None;
    }

    /// Cancels the armed utterance, if any. Returns whether one was
    /// cancelled.
    pub fn interrupt(&self) -> bool {
        match self.slot.lock().unwrap().as_ref() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Spawns a detached thread that turns stdin activity (enter, or
    /// space plus enter) into interrupts for the session's lifetime.
    ///
    /// The thread blocks on stdin and dies with the process; there is
    /// no portable way to unblock it sooner, and nothing it holds needs
    /// cleanup.
    pub fn spawn_stdin_watcher(&self, quiet: bool) {
        let slot = self.clone();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            let mut lines = stdin.lock().lines();
            while let Some(Ok(_)) = lines.next() {
                if slot.interrupt() && !quiet {
                    eprintln!("aryavoice: playback interrupted");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_with_nothing_armed_is_a_no_op() {
        let barge_in = BargeIn::new();
        assert!(!barge_in.interrupt());
    }

    #[test]
    fn interrupt_cancels_the_armed_handle() {
        let barge_in = BargeIn::new();
        let handle = SpeakHandle::new();
        barge_in.arm(&handle);

        assert!(barge_in.interrupt());
        assert!(handle.is_cancelled());
    }

    #[test]
    fn disarm_detaches_the_handle() {
        let barge_in = BargeIn::new();
        let handle = SpeakHandle::new();
        barge_in.arm(&handle);
        barge_in.disarm();

        assert!(!barge_in.interrupt());
        assert!(!handle.is_cancelled());
    }

    #[test]
    fn rearming_replaces_the_previous_handle() {
        let barge_in = BargeIn::new();
        let first = SpeakHandle::new();
        let second = SpeakHandle::new();
        barge_in.arm(&first);
        barge_in.arm(&second);

        barge_in.interrupt();
        assert!(!first.is_cancelled());
        assert!(second.is_cancelled());
    }

    #[test]
    fn clones_share_the_slot() {
        let barge_in = BargeIn::new();
        let watcher = barge_in.clone();
        let handle = SpeakHandle::new();
        barge_in.arm(&handle);

        assert!(watcher.interrupt());
        assert!(handle.is_cancelled());
    }
}
