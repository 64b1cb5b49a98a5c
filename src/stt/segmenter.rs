//! Speech segmentation for the streaming recognizer.
//!
//! Classifies incoming audio into utterance segments using RMS-based
//! thresholding: a segment opens when energy crosses the speech threshold
//! and closes after a sustained silence run. Unlike a one-shot detector,
//! the segmenter re-arms itself after each segment so a continuous stream
//! produces a sequence of segments.

use crate::clock::{Clock, SystemClock};
use crate::defaults;
use std::time::Instant;

/// Configuration for speech segmentation.
#[derive(Debug, Clone, Copy)]
pub struct SegmenterConfig {
    /// RMS threshold for detecting speech (0.0 to 1.0).
    pub speech_threshold: f32,
    /// Duration of silence before a segment is considered ended (milliseconds).
    pub silence_duration_ms: u32,
    /// Minimum duration of speech for a segment to be worth decoding (milliseconds).
    pub min_speech_ms: u32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            speech_threshold: defaults::SPEECH_THRESHOLD,
            silence_duration_ms: defaults::SILENCE_DURATION_MS,
            min_speech_ms: defaults::MIN_SPEECH_MS,
        }
    }
}

/// Current segmentation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentState {
    /// No open segment.
    Idle,
    /// A segment is open and speech is ongoing.
    Speaking,
    /// A segment is open but the last frames were silent.
    MaybeSilence,
}

/// Events emitted per processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentEvent {
    /// A new segment just opened.
    SegmentStart,
    /// Ongoing speech inside an open segment.
    Speech,
    /// Silence (inside or outside a segment, see state).
    Silence,
    /// The open segment just closed. `long_enough` reports whether the
    /// speech portion met the minimum duration.
    SegmentEnd { long_enough: bool },
}

/// Speech segmenter state machine.
pub struct SpeechSegmenter<C: Clock = SystemClock> {
    config: SegmenterConfig,
    state: SegmentState,
    speech_start: Option<Instant>,
    silence_start: Option<Instant>,
    clock: C,
}

impl<C: Clock> SpeechSegmenter<C> {
    /// Creates a new segmenter with the given configuration and clock.
    pub fn with_clock(config: SegmenterConfig, clock: C) -> Self {
        Self {
            config,
            state: SegmentState::Idle,
            speech_start: None,
            silence_start: None,
            clock,
        }
    }

    /// Processes one frame of audio samples.
    pub fn process(&mut self, samples: &[i16]) -> SegmentEvent {
        let rms = calculate_rms(samples);
        let is_speech = rms > self.config.speech_threshold;
        let now = self.clock.now();

        match self.state {
            SegmentState::Idle => {
                if is_speech {
                    self.state = SegmentState::Speaking;
                    self.speech_start = Some(now);
                    self.silence_start = None;
                    SegmentEvent::SegmentStart
                } else {
                    SegmentEvent::Silence
                }
            }
            SegmentState::Speaking => {
                if is_speech {
                    self.silence_start = None;
                    SegmentEvent::Speech
                } else {
                    self.state = SegmentState::MaybeSilence;
                    self.silence_start = Some(now);
                    SegmentEvent::Silence
                }
            }
            SegmentState::MaybeSilence => {
                if is_speech {
                    self.state = SegmentState::Speaking;
                    self.silence_start = None;
                    SegmentEvent::Speech
                } else {
                    let silence_elapsed = self
                        .silence_start
                        .map(|start| now.duration_since(start).as_millis() as u32)
                        .unwrap_or(0);

                    if silence_elapsed >= self.config.silence_duration_ms {
                        let speech_ms = self
                            .speech_start
                            .zip(self.silence_start)
                            .map(|(start, end)| end.duration_since(start).as_millis() as u32)
                            .unwrap_or(0);

                        // Re-arm for the next segment immediately
                        self.state = SegmentState::Idle;
                        self.speech_start = None;
                        self.silence_start = None;

                        SegmentEvent::SegmentEnd {
                            long_enough: speech_ms >= self.config.min_speech_ms,
                        }
                    } else {
                        SegmentEvent::Silence
                    }
                }
            }
        }
    }

    /// Whether a segment is currently open.
    pub fn in_segment(&self) -> bool {
        self.state != SegmentState::Idle
    }

    /// Returns the current state.
    pub fn state(&self) -> SegmentState {
        self.state
    }

    /// Abandons any open segment and returns to idle.
    pub fn reset(&mut self) {
        self.state = SegmentState::Idle;
        self.speech_start = None;
        self.silence_start = None;
    }
}

impl SpeechSegmenter<SystemClock> {
    /// Creates a new segmenter using the system clock.
    pub fn new(config: SegmenterConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

/// Calculates the Root Mean Square (RMS) of audio samples.
///
/// Returns a normalized value (0.0 to 1.0), where 0.0 is silence and
/// ~0.707 is a full-scale sine wave.
pub fn calculate_rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples
        .iter()
        .map(|&sample| {
            let normalized = sample as f64 / i16::MAX as f64;
            normalized * normalized
        })
        .sum();

    let mean_square = sum_squares / samples.len() as f64;
    mean_square.sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use std::time::Duration;

    fn make_silence(count: usize) -> Vec<i16> {
        vec![0i16; count]
    }

    fn make_speech(count: usize, amplitude: i16) -> Vec<i16> {
        vec![amplitude; count]
    }

    fn short_config() -> SegmenterConfig {
        SegmenterConfig {
            speech_threshold: 0.02,
            silence_duration_ms: 100,
            min_speech_ms: 50,
        }
    }

    #[test]
    fn test_rms_silence_is_zero() {
        let silence = make_silence(1000);
        assert_eq!(calculate_rms(&silence), 0.0);
    }

    #[test]
    fn test_rms_max_amplitude() {
        let max_signal = make_speech(1000, i16::MAX);
        let rms = calculate_rms(&max_signal);
        assert!((rms - 1.0).abs() < 0.001, "RMS should be ~1.0, got {}", rms);
    }

    #[test]
    fn test_rms_negative_samples() {
        let negative_signal = make_speech(1000, i16::MIN);
        let rms = calculate_rms(&negative_signal);
        assert!(rms > 0.99, "RMS should be ~1.0 for i16::MIN, got {}", rms);
    }

    #[test]
    fn test_calculate_rms_empty_samples() {
        let empty: Vec<i16> = vec![];
        assert_eq!(calculate_rms(&empty), 0.0);
    }

    #[test]
    fn test_segmenter_starts_idle() {
        let segmenter = SpeechSegmenter::new(SegmenterConfig::default());
        assert_eq!(segmenter.state(), SegmentState::Idle);
        assert!(!segmenter.in_segment());
    }

    #[test]
    fn test_segment_opens_on_speech() {
        let mut segmenter = SpeechSegmenter::new(SegmenterConfig::default());

        let event = segmenter.process(&make_silence(1000));
        assert_eq!(event, SegmentEvent::Silence);
        assert!(!segmenter.in_segment());

        let event = segmenter.process(&make_speech(1000, 3000));
        assert_eq!(event, SegmentEvent::SegmentStart);
        assert!(segmenter.in_segment());
    }

    #[test]
    fn test_segment_stays_open_during_speech() {
        let mut segmenter = SpeechSegmenter::new(SegmenterConfig::default());
        let speech = make_speech(1000, 3000);

        assert_eq!(segmenter.process(&speech), SegmentEvent::SegmentStart);
        assert_eq!(segmenter.process(&speech), SegmentEvent::Speech);
        assert_eq!(segmenter.process(&speech), SegmentEvent::Speech);
        assert_eq!(segmenter.state(), SegmentState::Speaking);
    }

    #[test]
    fn test_brief_silence_does_not_close_segment() {
        let mut segmenter = SpeechSegmenter::new(SegmenterConfig::default());
        let speech = make_speech(1000, 3000);
        let silence = make_silence(1000);

        segmenter.process(&speech);
        assert_eq!(segmenter.process(&silence), SegmentEvent::Silence);
        assert_eq!(segmenter.state(), SegmentState::MaybeSilence);

        // Speech resumes before the silence window elapses
        assert_eq!(segmenter.process(&speech), SegmentEvent::Speech);
        assert_eq!(segmenter.state(), SegmentState::Speaking);
    }

    #[test]
    fn test_segment_closes_after_silence_duration() {
        let clock = MockClock::new();
        let mut segmenter = SpeechSegmenter::with_clock(short_config(), clock.clone());

        let speech = make_speech(1000, 3000);
        let silence = make_silence(1000);

        segmenter.process(&speech);
        clock.advance(Duration::from_millis(200)); // speech portion: 200ms
        segmenter.process(&silence);
        clock.advance(Duration::from_millis(150));

        let event = segmenter.process(&silence);
        assert_eq!(event, SegmentEvent::SegmentEnd { long_enough: true });
    }

    #[test]
    fn test_too_short_segment_reports_not_long_enough() {
        let clock = MockClock::new();
        let mut segmenter = SpeechSegmenter::with_clock(short_config(), clock.clone());

        segmenter.process(&make_speech(1000, 3000));
        clock.advance(Duration::from_millis(10)); // only 10ms of speech
        segmenter.process(&make_silence(1000));
        clock.advance(Duration::from_millis(150));

        let event = segmenter.process(&make_silence(1000));
        assert_eq!(event, SegmentEvent::SegmentEnd { long_enough: false });
    }

    #[test]
    fn test_segmenter_rearms_after_segment_end() {
        let clock = MockClock::new();
        let mut segmenter = SpeechSegmenter::with_clock(short_config(), clock.clone());

        let speech = make_speech(1000, 3000);
        let silence = make_silence(1000);

        // First segment
        segmenter.process(&speech);
        clock.advance(Duration::from_millis(200));
        segmenter.process(&silence);
        clock.advance(Duration::from_millis(150));
        assert!(matches!(
            segmenter.process(&silence),
            SegmentEvent::SegmentEnd { .. }
        ));
        assert!(!segmenter.in_segment());

        // Second segment opens without a reset call
        assert_eq!(segmenter.process(&speech), SegmentEvent::SegmentStart);
    }

    #[test]
    fn test_reset_abandons_open_segment() {
        let mut segmenter = SpeechSegmenter::new(SegmenterConfig::default());

        segmenter.process(&make_speech(1000, 3000));
        assert!(segmenter.in_segment());

        segmenter.reset();
        assert!(!segmenter.in_segment());

        let event = segmenter.process(&make_speech(1000, 3000));
        assert_eq!(event, SegmentEvent::SegmentStart);
    }
}
