//! Streaming speech recognition over a [`Transcriber`] backend.
//!
//! The recognizer consumes audio frames, segments them by speech energy,
//! and emits [`TranscriptEvent`]s: revisable partials while a segment is
//! open, a committed final when it closes. A blocking one-shot mode
//! ([`StreamingRecognizer::listen_once`]) records a fixed-length window
//! and returns the last final it produced, for turn-based Q&A where
//! predictable round-trip latency beats continuous streaming.

use crate::audio::AudioSource;
use crate::clock::{Clock, SystemClock};
use crate::defaults;
use crate::error::{AryaError, Result};
use crate::pipeline::types::{AudioFrame, TranscriptEvent};
use crate::stt::segmenter::{SegmentEvent, SegmenterConfig, SpeechSegmenter};
use crate::stt::transcriber::Transcriber;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the streaming recognizer.
#[derive(Debug, Clone, Copy)]
pub struct RecognizerConfig {
    /// Sample rate the decoder session is keyed to. Audio sources must
    /// deliver at this rate; a mismatch is rejected at wiring time.
    pub sample_rate: u32,
    /// Interval between partial hypotheses while a segment is open (ms).
    pub partial_interval_ms: u32,
    /// Open segments longer than this are force-finalized (ms).
    pub max_segment_ms: u32,
    pub segmenter: SegmenterConfig,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            partial_interval_ms: defaults::PARTIAL_INTERVAL_MS,
            max_segment_ms: defaults::MAX_SEGMENT_MS,
            segmenter: SegmenterConfig::default(),
        }
    }
}

/// Stateful streaming recognizer.
///
/// Not reentrant: one recognizer drives one capture session at a time.
pub struct StreamingRecognizer<C: Clock = SystemClock> {
    transcriber: Arc<dyn Transcriber>,
    segmenter: SpeechSegmenter<C>,
    config: RecognizerConfig,
    segment: Vec<i16>,
    samples_since_partial: usize,
}

impl<C: Clock> StreamingRecognizer<C> {
    /// Creates a recognizer with an injected clock (used by the segmenter
    /// for silence timing).
    pub fn with_clock(
        transcriber: Arc<dyn Transcriber>,
        config: RecognizerConfig,
        clock: C,
    ) -> Result<Self> {
        if !transcriber.is_ready() {
            return Err(AryaError::RecognizerUnavailable {
                message: format!("backend '{}' is not ready", transcriber.backend_name()),
            });
        }
        Ok(Self {
            transcriber,
            segmenter: SpeechSegmenter::with_clock(config.segmenter, clock),
            config,
            segment: Vec::new(),
            samples_since_partial: 0,
        })
    }
}

impl StreamingRecognizer<SystemClock> {
    /// Creates a recognizer using the system clock.
    pub fn new(transcriber: Arc<dyn Transcriber>, config: RecognizerConfig) -> Result<Self> {
        Self::with_clock(transcriber, config, SystemClock)
    }
}

impl<C: Clock> StreamingRecognizer<C> {
    /// The sample rate this recognizer's decoder session is keyed to.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Verifies an audio source delivers at the recognizer's rate.
    pub fn check_source_rate(&self, source: &dyn AudioSource) -> Result<()> {
        let actual = source.sample_rate();
        if actual != self.config.sample_rate {
            return Err(AryaError::SampleRateMismatch {
                expected: self.config.sample_rate,
                actual,
            });
        }
        Ok(())
    }

    /// Feeds one frame into the decoder session.
    ///
    /// Returns `None` when no hypothesis boundary was reached, a
    /// `Partial` while a segment is open, or a `Final` when a segment
    /// closed. Decode failures on a final boundary surface as
    /// `TranscriptionFailure` with the segment discarded, so the caller
    /// can treat the utterance as empty and move on.
    pub fn accept(&mut self, frame: &AudioFrame) -> Result<Option<TranscriptEvent>> {
        let event = self.segmenter.process(&frame.samples);

        match event {
            SegmentEvent::SegmentStart => {
                self.segment.clear();
                self.segment.extend_from_slice(&frame.samples);
                self.samples_since_partial = frame.samples.len();
                Ok(None)
            }
            SegmentEvent::Speech => {
                self.segment.extend_from_slice(&frame.samples);
                self.samples_since_partial += frame.samples.len();

                if self.segment_ms() >= self.config.max_segment_ms {
                    return self.finalize_segment().map(Some);
                }

                if self.samples_since_partial >= self.partial_interval_samples() {
                    self.samples_since_partial = 0;
                    match self.transcriber.transcribe(&self.segment) {
                        Ok(text) if !text.trim().is_empty() => {
                            Ok(Some(TranscriptEvent::Partial(text)))
                        }
                        Ok(_) => Ok(None),
                        Err(e) => {
                            // Partial hypotheses are best-effort; the final
                            // decode gets another chance at this segment.
                            eprintln!("aryavoice: partial decode failed: {}", e);
                            Ok(None)
                        }
                    }
                } else {
                    Ok(None)
                }
            }
            SegmentEvent::Silence => {
                // Silence inside an open segment stays part of it; the
                // trailing context helps the decoder with word endings.
                if self.segmenter.in_segment() {
                    self.segment.extend_from_slice(&frame.samples);
                }
                Ok(None)
            }
            SegmentEvent::SegmentEnd { long_enough } => {
                if !long_enough {
                    self.discard_segment();
                    return Ok(None);
                }
                self.finalize_segment().map(Some)
            }
        }
    }

    /// Records a fixed-length window from `source` and returns the last
    /// final transcript observed (empty string if none).
    ///
    /// The window length is measured in captured samples, so a source
    /// that delivers faster than real time (tests, file playback) is
    /// consumed as fast as it arrives. Any segment still open at the end
    /// of the window is flushed through the decoder.
    pub fn listen_once(&mut self, source: &mut dyn AudioSource, duration: Duration) -> Result<String> {
        self.check_source_rate(source)?;
        self.reset();

        source.start()?;
        let listened = self.listen_window(source, duration);
        let stopped = source.stop();

        let text = listened?;
        stopped?;
        Ok(text)
    }

    fn listen_window(&mut self, source: &mut dyn AudioSource, duration: Duration) -> Result<String> {
        let needed_samples =
            (duration.as_secs_f64() * self.config.sample_rate as f64).ceil() as usize;
        let mut captured = 0usize;
        let mut last_final = String::new();
        let mut sequence = 0u64;

        while captured < needed_samples {
            let samples = source.read_samples()?;
            if samples.is_empty() {
                std::thread::sleep(Duration::from_millis(16));
                continue;
            }

            captured += samples.len();
            let frame = AudioFrame::new(samples, std::time::Instant::now(), sequence);
            sequence += 1;

            match self.accept(&frame) {
                Ok(Some(TranscriptEvent::Final(text))) => {
                    if !text.trim().is_empty() {
                        last_final = text;
                    }
                }
                Ok(_) => {}
                Err(AryaError::TranscriptionFailure { message }) => {
                    // Per-utterance failure: treat as silence, keep listening
                    eprintln!("aryavoice: transcription failed: {}", message);
                }
                Err(e) => return Err(e),
            }
        }

        // Flush whatever segment the window cut off
        match self.flush() {
            Ok(Some(TranscriptEvent::Final(text))) => {
                if !text.trim().is_empty() {
                    last_final = text;
                }
            }
            Ok(_) => {}
            Err(AryaError::TranscriptionFailure { message }) => {
                // Per-utterance failure: the caller sees an empty window
                eprintln!("aryavoice: transcription failed: {}", message);
            }
            Err(e) => return Err(e),
        }

        Ok(last_final)
    }

    /// Force-finalizes any open segment.
    pub fn flush(&mut self) -> Result<Option<TranscriptEvent>> {
        if !self.segmenter.in_segment() || self.segment.is_empty() {
            self.discard_segment();
            return Ok(None);
        }
        self.finalize_segment().map(Some)
    }

    /// Clears all decoder state for a new listening cycle.
    pub fn reset(&mut self) {
        self.segmenter.reset();
        self.segment.clear();
        self.samples_since_partial = 0;
    }

    fn finalize_segment(&mut self) -> Result<TranscriptEvent> {
        let samples = std::mem::take(&mut self.segment);
        self.segmenter.reset();
        self.samples_since_partial = 0;

        let text = self.transcriber.transcribe(&samples)?;
        Ok(TranscriptEvent::Final(text))
    }

    fn discard_segment(&mut self) {
        self.segment.clear();
        self.samples_since_partial = 0;
    }

    fn segment_ms(&self) -> u32 {
        (self.segment.len() as u64 * 1000 / self.config.sample_rate as u64) as u32
    }

    fn partial_interval_samples(&self) -> usize {
        (self.config.sample_rate as u64 * self.config.partial_interval_ms as u64 / 1000) as usize
    }
}
