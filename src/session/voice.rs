//! The voice session state machine.
//!
//! Passive listening, wake detection, the bounded active Q&A window,
//! answering with barge-in, and session teardown. The session holds the
//! speaking and retrieval seams as trait objects and a clock for the
//! window ceiling; everything audio-shaped stays outside, feeding in
//! transcript snapshots and utterances.

use crate::clock::{Clock, SystemClock};
use crate::defaults;
use crate::error::Result;
use crate::retrieval::{Retriever, best_hit};
use crate::session::barge_in::BargeIn;
use crate::text::{Corrections, WakePhraseSet, is_english, normalize};
use crate::tts::SpeechOutput;
use std::time::{Duration, Instant};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Passively streaming audio, watching for a wake phrase.
    AwaitingWake,
    /// Wake phrase heard; accepting direct questions.
    ActiveWindow,
    /// Speaking an answer.
    Answering,
    /// Terminal: user said goodbye.
    SessionEnd,
}

/// Tunable session behavior. Built from [`crate::config::Config`] by the
/// application layer; tests construct it directly.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub wake_phrases: Vec<String>,
    pub window_ceiling: Duration,
    pub english_ratio_threshold: f32,
    pub top_k: usize,
    /// Settle pause after playback, before the next listen window.
    pub post_speech_pause: Duration,
    /// Suppresses status diagnostics on stderr, never spoken output.
    pub quiet: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            wake_phrases: defaults::WAKE_PHRASES.iter().map(|p| (*p).to_string()).collect(),
            window_ceiling: Duration::from_secs(defaults::WINDOW_CEILING_SECS),
            english_ratio_threshold: defaults::ENGLISH_RATIO_THRESHOLD,
            top_k: defaults::TOP_K,
            post_speech_pause: defaults::POST_SPEECH_PAUSE,
            quiet: false,
        }
    }
}

/// The session state machine.
pub struct VoiceSession<C: Clock = SystemClock> {
    config: SessionConfig,
    phrases: WakePhraseSet,
    corrections: Corrections,
    speech: Box<dyn SpeechOutput>,
    retriever: Box<dyn Retriever>,
    barge_in: BargeIn,
    clock: C,
    state: SessionState,
    window_start: Option<Instant>,
}

impl VoiceSession<SystemClock> {
    pub fn new(
        config: SessionConfig,
        speech: Box<dyn SpeechOutput>,
        retriever: Box<dyn Retriever>,
    ) -> Self {
        Self::with_clock(config, speech, retriever, SystemClock)
    }
}

impl<C: Clock> VoiceSession<C> {
    pub fn with_clock(
        config: SessionConfig,
        speech: Box<dyn SpeechOutput>,
        retriever: Box<dyn Retriever>,
        clock: C,
    ) -> Self {
        let phrases = WakePhraseSet::new(&config.wake_phrases);
        Self {
            config,
            phrases,
            corrections: Corrections::builtin(),
            speech,
            retriever,
            barge_in: BargeIn::new(),
            clock,
            state: SessionState::AwaitingWake,
            window_start: None,
        }
    }

    /// Replaces the correction table (built-ins plus configured extras).
    pub fn with_corrections(mut self, corrections: Corrections) -> Self {
        self.corrections = corrections;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The interrupt slot; wire a stdin watcher (or anything else) to it.
    pub fn barge_in(&self) -> BargeIn {
        self.barge_in.clone()
    }

    /// Feeds one transcript snapshot while awaiting a wake phrase.
    ///
    /// Snapshots include the current partial, so a wake phrase spoken
    /// mid-utterance triggers without waiting for a final boundary.
    /// Returns whether the wake phrase was detected.
    pub fn on_transcript(&mut self, snapshot: &str) -> Result<bool> {
        if self.state != SessionState::AwaitingWake {
            return Ok(false);
        }
        if !self.phrases.matches(snapshot) {
            return Ok(false);
        }

        if !self.config.quiet {
            eprintln!("aryavoice: wake phrase detected");
        }
        self.speak_and_wait(defaults::GREETING);
        self.state = SessionState::ActiveWindow;
        self.window_start = Some(self.clock.now());
        Ok(true)
    }

    /// Processes one utterance captured inside the active window.
    pub fn on_utterance(&mut self, raw: &str) -> Result<()> {
        if self.state != SessionState::ActiveWindow {
            return Ok(());
        }

        // Noise transcribed into another script is no utterance at all
        let raw = if is_english(raw, self.config.english_ratio_threshold) {
            raw
        } else {
            ""
        };

        let question = self.corrections.apply(raw.trim());
        let normalized = normalize(&question);

        if normalized.is_empty() {
            self.speak_and_wait(defaults::REPROMPT);
            return Ok(());
        }

        if defaults::VOICE_EXIT_KEYWORDS.contains(&normalized.as_str()) {
            self.speak_and_wait(defaults::FAREWELL);
            self.barge_in.disarm();
            self.state = SessionState::SessionEnd;
            return Ok(());
        }

        self.answer(&question)
    }

    /// Applies the active-window ceiling. Returns true when the window
    /// just expired (at most once per window).
    pub fn poll_timeout(&mut self) -> Result<bool> {
        if self.state != SessionState::ActiveWindow {
            return Ok(false);
        }
        let Some(start) = self.window_start else {
            return Ok(false);
        };
        if self.clock.now().duration_since(start) <= self.config.window_ceiling {
            return Ok(false);
        }

        self.speak_and_wait(defaults::WINDOW_ENDED);
        self.state = SessionState::AwaitingWake;
        self.window_start = None;
        Ok(true)
    }

    /// Cancels in-flight speech and ends the session (process shutdown).
    pub fn shutdown(&mut self) {
        self.barge_in.interrupt();
        self.barge_in.disarm();
        self.state = SessionState::SessionEnd;
    }

    fn answer(&mut self, question: &str) -> Result<()> {
        self.state = SessionState::Answering;

        let hits = match self.retriever.search(question, self.config.top_k) {
            Ok(hits) => hits,
            Err(e) => {
                eprintln!("aryavoice: retrieval failed: {e}");
                Vec::new()
            }
        };

        let answer = best_hit(&hits)
            .and_then(|(_, record)| record.spoken_answer().map(str::to_string))
            .unwrap_or_else(|| defaults::NO_ANSWER.to_string());

        self.speak_and_wait(&answer);

        self.state = SessionState::ActiveWindow;
        self.window_start = Some(self.clock.now());
        Ok(())
    }

    /// Speaks text and blocks until playback completes or is interrupted.
    ///
    /// Synthesis failures degrade to a logged skip; the session always
    /// survives its speech output.
    fn speak_and_wait(&mut self, text: &str) {
        match self.speech.speak(text) {
            Ok(handle) => {
                self.barge_in.arm(&handle);
                handle.wait();
                self.barge_in.disarm();
                if handle.is_cancelled() {
                    if !self.config.quiet {
                        eprintln!("aryavoice: playback interrupted, listening again");
                    }
                } else if !self.config.post_speech_pause.is_zero() {
                    std::thread::sleep(self.config.post_speech_pause);
                }
            }
            Err(e) => {
                eprintln!("aryavoice: speech output failed, skipping: {e}");
            }
        }
    }
}
