//! HTTP speech synthesis and MP3 decoding.

use crate::error::{AryaError, Result};
use std::io::Cursor;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://translate.google.com/translate_tts";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Synthesizes speech by fetching MP3 audio from a translate-style TTS
/// endpoint.
pub struct HttpSynthesizer {
    client: reqwest::blocking::Client,
    endpoint: String,
    language: String,
}

impl HttpSynthesizer {
    pub fn new(language: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AryaError::SynthesisFailure {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: language.to_string(),
        })
    }

    /// Overrides the synthesis endpoint (mock servers in tests).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Fetches MP3 bytes for the given text.
    pub fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.language.as_str()),
                ("q", text),
            ])
            .send()
            .map_err(|e| AryaError::SynthesisFailure {
                message: format!("synthesis request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AryaError::SynthesisFailure {
                message: format!("synthesis API error {}", status),
            });
        }

        let bytes = response.bytes().map_err(|e| AryaError::SynthesisFailure {
            message: format!("failed to read synthesis response: {}", e),
        })?;
        Ok(bytes.to_vec())
    }
}

/// Decoded audio: mono f32 samples plus their rate.
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Decodes MP3 bytes to mono f32 samples, averaging stereo channels.
pub fn decode_mp3(mp3_data: &[u8]) -> Result<DecodedAudio> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(mp3_data));
    let mut samples = Vec::new();
    let mut sample_rate = 0u32;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                sample_rate = frame.sample_rate as u32;
                if frame.channels == 2 {
                    samples.extend(frame.data.chunks(2).map(|chunk| {
                        let left = f32::from(chunk[0]) / 32768.0;
                        let right = f32::from(chunk.get(1).copied().unwrap_or(chunk[0])) / 32768.0;
                        (left + right) / 2.0
                    }));
                } else {
                    samples.extend(frame.data.iter().map(|&s| f32::from(s) / 32768.0));
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => {
                return Err(AryaError::Playback {
                    message: format!("MP3 decode error: {}", e),
                });
            }
        }
    }

    if samples.is_empty() || sample_rate == 0 {
        return Err(AryaError::Playback {
            message: "MP3 stream contained no audio".to_string(),
        });
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
    })
}
