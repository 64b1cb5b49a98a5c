//! Cloud speech-to-text backend.
//!
//! Posts LINEAR16 WAV audio (base64-encoded in a JSON body) to a
//! Google-style recognition endpoint and picks the highest-confidence
//! alternative from the response. Runs over a blocking HTTP client;
//! callers already live on dedicated worker threads.

use crate::audio::wav::encode_wav;
use crate::error::{AryaError, Result};
use crate::stt::transcriber::Transcriber;
use base64::Engine;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://speech.googleapis.com/v1/speech:recognize";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeRequest {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    encoding: &'static str,
    sample_rate_hertz: u32,
    language_code: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    speech_contexts: Vec<SpeechContext>,
}

#[derive(serde::Serialize)]
struct SpeechContext {
    phrases: Vec<String>,
}

#[derive(serde::Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(serde::Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognizeResult>,
}

#[derive(serde::Deserialize)]
struct RecognizeResult {
    #[serde(default)]
    alternatives: Vec<RecognizeAlternative>,
}

#[derive(serde::Deserialize)]
struct RecognizeAlternative {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    confidence: f32,
}

/// Transcriber backed by a cloud recognition API.
pub struct CloudTranscriber {
    client: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
    language: String,
    sample_rate: u32,
    hints: Vec<String>,
}

impl CloudTranscriber {
    /// Creates a cloud transcriber.
    ///
    /// # Errors
    ///
    /// Returns `RecognizerUnavailable` when no API key is configured.
    pub fn new(api_key: Option<&str>, language: &str, sample_rate: u32) -> Result<Self> {
        let api_key = match api_key {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                return Err(AryaError::RecognizerUnavailable {
                    message: "no speech API key configured (set ARYAVOICE_API_KEY)".to_string(),
                });
            }
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AryaError::RecognizerUnavailable {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: language.to_string(),
            sample_rate,
            hints: Vec::new(),
        })
    }

    /// Overrides the recognition endpoint (local mock servers in tests,
    /// regional endpoints in deployments).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Phrase hints biasing recognition toward domain vocabulary (the
    /// wake phrases, faculty names).
    pub fn with_hints(mut self, hints: &[String]) -> Self {
        self.hints = hints.to_vec();
        self
    }

    fn build_request(&self, audio: &[i16]) -> Result<RecognizeRequest> {
        let wav = encode_wav(audio, self.sample_rate)?;
        let content = base64::engine::general_purpose::STANDARD.encode(&wav);

        Ok(RecognizeRequest {
            config: RecognitionConfig {
                encoding: "LINEAR16",
                sample_rate_hertz: self.sample_rate,
                language_code: self.language.clone(),
                speech_contexts: if self.hints.is_empty() {
                    Vec::new()
                } else {
                    vec![SpeechContext {
                        phrases: self.hints.clone(),
                    }]
                },
            },
            audio: RecognitionAudio { content },
        })
    }

    fn best_transcript(response: RecognizeResponse) -> String {
        response
            .results
            .first()
            .and_then(|result| {
                result
                    .alternatives
                    .iter()
                    .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
            })
            .map(|alt| alt.transcript.clone())
            .unwrap_or_default()
    }
}

impl Transcriber for CloudTranscriber {
    fn transcribe(&self, audio: &[i16]) -> Result<String> {
        let request = self.build_request(audio)?;
        let url = format!("{}?key={}", self.endpoint, self.api_key);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| AryaError::TranscriptionFailure {
                message: format!("recognition request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AryaError::TranscriptionFailure {
                message: format!("recognition API error {}: {}", status, body),
            });
        }

        let parsed: RecognizeResponse =
            response
                .json()
                .map_err(|e| AryaError::TranscriptionFailure {
                    message: format!("failed to parse recognition response: {}", e),
                })?;

        Ok(Self::best_transcript(parsed))
    }

    fn backend_name(&self) -> &str {
        "cloud"
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}
