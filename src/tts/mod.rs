//! Speech output: the session's speaking seam, HTTP synthesis, MP3
//! decode, and cancellable playback.

#[cfg(feature = "cpal-audio")]
pub mod playback;
pub mod speech;
pub mod synth;

pub use speech::{MockSpeech, SpeakHandle, SpeechOutput};
pub use synth::{DecodedAudio, HttpSynthesizer, decode_mp3};

#[cfg(feature = "cpal-audio")]
pub use engine::CloudSpeech;

#[cfg(feature = "cpal-audio")]
mod engine {
    use super::playback::AudioPlayback;
    use super::speech::{SpeakHandle, SpeechOutput};
    use super::synth::{HttpSynthesizer, decode_mp3};
    use crate::error::Result;
    use std::sync::Arc;

    /// Speech output backed by HTTP synthesis and local playback.
    ///
    /// Each utterance runs on its own thread: synthesize, decode, play.
    /// Failures degrade to a logged skip with the handle marked
    /// finished, so the session never dies over a bad network call.
    pub struct CloudSpeech {
        synthesizer: Arc<HttpSynthesizer>,
    }

    impl CloudSpeech {
        pub fn new(language: &str, endpoint: Option<&str>) -> Result<Self> {
            let mut synthesizer = HttpSynthesizer::new(language)?;
            if let Some(endpoint) = endpoint {
                synthesizer = synthesizer.with_endpoint(endpoint);
            }
            Ok(Self {
                synthesizer: Arc::new(synthesizer),
            })
        }
    }

    impl SpeechOutput for CloudSpeech {
        fn speak(&mut self, text: &str) -> Result<SpeakHandle> {
            let handle = SpeakHandle::new();
            let thread_handle = handle.clone();
            let synthesizer = Arc::clone(&self.synthesizer);
            let text = text.to_string();

            std::thread::spawn(move || {
                let played = synthesizer
                    .synthesize(&text)
                    .and_then(|mp3| decode_mp3(&mp3))
                    .and_then(|audio| AudioPlayback::play(&audio, &thread_handle));
                if let Err(e) = played {
                    eprintln!("aryavoice: speech output failed, skipping: {e}");
                    thread_handle.mark_finished();
                }
            });

            Ok(handle)
        }
    }
}
