//! Application wiring: builds the capture, recognition, retrieval and
//! speech components from configuration and drives the voice loop.
//!
//! The voice loop alternates between two capture modes. While awaiting
//! the wake phrase it runs the continuous listener pipeline; once the
//! session is active it records discrete turn-based windows with
//! [`StreamingRecognizer::listen_once`]. Only one capture session is
//! open at a time, so the microphone is always released before the mode
//! switches.

use crate::chat;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::{AryaError, Result};
use crate::pipeline::{ListenerConfig, listener};
use crate::retrieval::CorpusIndex;
use crate::session::{SessionState, VoiceSession};
use crate::stt::StreamingRecognizer;
use crate::tts::{SpeakHandle, SpeechOutput};
use crate::{audio::AudioSource, defaults};
use std::time::Duration;

/// Speech output that prints instead of playing, for `tts.enabled =
/// false` and headless runs.
pub struct ConsoleSpeech;

impl SpeechOutput for ConsoleSpeech {
    fn speak(&mut self, text: &str) -> Result<SpeakHandle> {
        println!("Arya: {text}");
        Ok(SpeakHandle::completed())
    }
}

/// Timing knobs for the voice loop, split out from [`Config`] so tests
/// can drive the loop directly.
#[derive(Debug, Clone)]
pub struct VoiceLoopConfig {
    pub listener: ListenerConfig,
    pub listen_duration: Duration,
    /// Give a short first window a second chance before processing.
    pub retry_empty: bool,
    pub retry_max_chars: usize,
    /// 1 prints transcript events, 2 adds collected utterances.
    pub verbosity: u8,
}

impl From<&Config> for VoiceLoopConfig {
    fn from(config: &Config) -> Self {
        Self {
            listener: ListenerConfig {
                frame_samples: config.audio.frame_samples,
                queue_capacity: defaults::FRAME_QUEUE_CAPACITY,
            },
            listen_duration: Duration::from_secs_f32(config.wake.listen_secs),
            retry_empty: config.wake.retry_empty,
            retry_max_chars: defaults::LISTEN_RETRY_MAX_CHARS,
            verbosity: 0,
        }
    }
}

/// Records up to two listen windows and joins them.
///
/// A first window that already carries more than `retry_max_chars`
/// characters is taken as the whole utterance; otherwise a second
/// window catches questions that straddle the window boundary.
pub fn collect_utterance<F>(
    mut listen: F,
    retry_empty: bool,
    retry_max_chars: usize,
) -> Result<String>
where
    F: FnMut() -> Result<String>,
{
    let first = listen()?;
    let first = first.trim();
    if !retry_empty || first.chars().count() > retry_max_chars {
        return Ok(first.to_string());
    }

    let second = listen()?;
    Ok(format!("{} {}", first, second.trim()).trim().to_string())
}

/// Drives a session to completion over factory-built capture sessions.
///
/// Each phase owns a fresh source and recognizer: the continuous wake
/// listener consumes one pair, and every turn-based listen window
/// consumes another. The factories fail fatally; a microphone that
/// cannot be reopened ends the run.
pub fn voice_loop<C, SC>(
    session: &mut VoiceSession<SC>,
    make_source: &mut dyn FnMut() -> Result<Box<dyn AudioSource>>,
    make_recognizer: &mut dyn FnMut() -> Result<StreamingRecognizer<C>>,
    config: &VoiceLoopConfig,
) -> Result<()>
where
    C: Clock + 'static,
    SC: Clock,
{
    loop {
        match session.state() {
            SessionState::AwaitingWake => {
                let handle = listener::start(make_source()?, make_recognizer()?, config.listener)?;

                while session.state() == SessionState::AwaitingWake && handle.is_running() {
                    match handle.events().recv_timeout(Duration::from_millis(100)) {
                        Ok(event) => {
                            if config.verbosity >= 1 {
                                eprintln!("aryavoice: transcript: {}", event.snapshot);
                            }
                            session.on_transcript(&event.snapshot)?;
                        }
                        Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
                        Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                    }
                }

                let alive = handle.is_running();
                handle.stop();

                if session.state() == SessionState::AwaitingWake && !alive {
                    return Err(AryaError::AudioCapture {
                        message: "wake listener stopped unexpectedly".to_string(),
                    });
                }
            }
            SessionState::ActiveWindow => {
                if session.poll_timeout()? {
                    continue;
                }

                let duration = config.listen_duration;
                let utterance = collect_utterance(
                    || {
                        let mut source = make_source()?;
                        let mut recognizer = make_recognizer()?;
                        recognizer.listen_once(&mut *source, duration)
                    },
                    config.retry_empty,
                    config.retry_max_chars,
                )?;

                if config.verbosity >= 2 {
                    eprintln!("aryavoice: utterance: {:?}", utterance);
                }
                session.on_utterance(&utterance)?;
            }
            // Answering is transient inside on_utterance; the loop
            // never observes it.
            SessionState::Answering => {}
            SessionState::SessionEnd => break,
        }
    }

    Ok(())
}

/// Opens the retrieval index, failing fatally when it is missing.
pub fn load_index(config: &Config, quiet: bool) -> Result<CorpusIndex> {
    let index = CorpusIndex::load(&config.index.dir)?;
    if !quiet {
        eprintln!(
            "aryavoice: loaded {} records from {}",
            index.len(),
            config.index.dir.display()
        );
    }
    Ok(index)
}

/// Runs the text chat surface.
pub fn run_chat(config: &Config, quiet: bool) -> Result<()> {
    let index = load_index(config, quiet)?;
    chat::run_chat(&index, config.index.top_k)
}

#[cfg(feature = "cpal-audio")]
pub use mic::run_voice;

#[cfg(feature = "cpal-audio")]
mod mic {
    use super::*;
    use crate::audio::{AudioSourceConfig, CpalAudioSource, suppress_audio_warnings};
    use crate::session::SessionConfig;
    use crate::stt::{CloudTranscriber, RecognizerConfig, SegmenterConfig};
    use crate::text::Corrections;
    use crate::tts::CloudSpeech;
    use std::sync::Arc;

    /// Runs the voice surface end to end.
    ///
    /// Startup failures (missing index, no API key, no microphone) are
    /// fatal and propagate to the caller; everything after startup
    /// degrades per component.
    pub fn run_voice(config: &Config, quiet: bool, verbosity: u8) -> Result<()> {
        suppress_audio_warnings();

        let index = load_index(config, quiet)?;

        let mut transcriber = CloudTranscriber::new(
            config.stt.api_key.as_deref(),
            &config.stt.language,
            config.audio.sample_rate,
        )?;
        if let Some(endpoint) = &config.stt.endpoint {
            transcriber = transcriber.with_endpoint(endpoint);
        }
        transcriber = transcriber.with_hints(&config.wake.phrases);
        let transcriber: Arc<CloudTranscriber> = Arc::new(transcriber);

        let speech: Box<dyn SpeechOutput> = if config.tts.enabled {
            Box::new(CloudSpeech::new(
                &config.tts.language,
                config.tts.endpoint.as_deref(),
            )?)
        } else {
            Box::new(ConsoleSpeech)
        };

        let session_config = SessionConfig {
            wake_phrases: config.wake.phrases.clone(),
            window_ceiling: Duration::from_secs(config.wake.window_ceiling_secs),
            english_ratio_threshold: config.stt.english_ratio_threshold,
            top_k: config.index.top_k,
            post_speech_pause: defaults::POST_SPEECH_PAUSE,
            quiet,
        };
        let corrections = if config.corrections.pairs.is_empty() {
            Corrections::builtin()
        } else {
            let extras: Vec<(String, String)> = config
                .corrections
                .pairs
                .iter()
                .map(|p| (p.from.clone(), p.to.clone()))
                .collect();
            Corrections::with_extras(&extras)
        };
        let mut session =
            VoiceSession::new(session_config, speech, Box::new(index)).with_corrections(corrections);

        // Enter on stdin interrupts whatever is being spoken
        session.barge_in().spawn_stdin_watcher(quiet);

        let source_config = AudioSourceConfig {
            device: config.audio.device,
            sample_rate: config.audio.sample_rate,
            frame_samples: config.audio.frame_samples,
        };
        let recognizer_config = RecognizerConfig {
            sample_rate: config.audio.sample_rate,
            partial_interval_ms: config.stt.partial_interval_ms,
            max_segment_ms: defaults::MAX_SEGMENT_MS,
            segmenter: SegmenterConfig {
                speech_threshold: config.stt.speech_threshold,
                silence_duration_ms: config.stt.silence_duration_ms,
                min_speech_ms: defaults::MIN_SPEECH_MS,
            },
        };

        let mut make_source = move || -> Result<Box<dyn AudioSource>> {
            Ok(Box::new(CpalAudioSource::new(&source_config)?))
        };
        let mut make_recognizer = {
            let transcriber = Arc::clone(&transcriber);
            move || {
                StreamingRecognizer::new(
                    Arc::clone(&transcriber) as Arc<dyn crate::stt::Transcriber>,
                    recognizer_config,
                )
            }
        };

        if !quiet {
            eprintln!(
                "aryavoice: listening for wake phrase ({})",
                config.wake.phrases.join(", ")
            );
        }
        let mut loop_config = VoiceLoopConfig::from(config);
        loop_config.verbosity = verbosity;
        let result = voice_loop(
            &mut session,
            &mut make_source,
            &mut make_recognizer,
            &loop_config,
        );
        session.shutdown();
        result
    }
}
