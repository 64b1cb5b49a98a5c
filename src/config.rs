use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::defaults;
use crate::error::{AryaError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub wake: WakeConfig,
    pub stt: SttConfig,
    pub tts: TtsConfig,
    pub index: IndexConfig,
    pub corrections: CorrectionsConfig,
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Input device index from `aryavoice devices`; None picks the default device.
    pub device: Option<usize>,
    pub sample_rate: u32,
    pub frame_samples: usize,
}

/// Wake phrase and active-window configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WakeConfig {
    pub phrases: Vec<String>,
    pub window_ceiling_secs: u64,
    pub listen_secs: f32,
    /// Retry an empty listen window once before re-prompting.
    pub retry_empty: bool,
}

/// Speech-to-text configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SttConfig {
    /// Cloud recognition API key; also settable via ARYAVOICE_API_KEY.
    pub api_key: Option<String>,
    pub language: String,
    /// Override the recognition endpoint (testing, regional endpoints).
    pub endpoint: Option<String>,
    pub speech_threshold: f32,
    pub silence_duration_ms: u32,
    pub partial_interval_ms: u32,
    pub english_ratio_threshold: f32,
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TtsConfig {
    pub enabled: bool,
    pub language: String,
    /// Override the synthesis endpoint.
    pub endpoint: Option<String>,
}

/// Retrieval index configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexConfig {
    pub dir: PathBuf,
    pub top_k: usize,
}

/// Transcript post-processing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorrectionsConfig {
    /// Ordered substring replacements applied after transcription.
    /// When empty, the built-in domain corrections are used.
    pub pairs: Vec<CorrectionPair>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrectionPair {
    pub from: String,
    pub to: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: defaults::SAMPLE_RATE,
            frame_samples: defaults::FRAME_SAMPLES,
        }
    }
}

impl Default for WakeConfig {
    fn default() -> Self {
        Self {
            phrases: defaults::WAKE_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            window_ceiling_secs: defaults::WINDOW_CEILING_SECS,
            listen_secs: defaults::LISTEN_SECS,
            retry_empty: true,
        }
    }
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: defaults::STT_LANGUAGE.to_string(),
            endpoint: None,
            speech_threshold: defaults::SPEECH_THRESHOLD,
            silence_duration_ms: defaults::SILENCE_DURATION_MS,
            partial_interval_ms: defaults::PARTIAL_INTERVAL_MS,
            english_ratio_threshold: defaults::ENGLISH_RATIO_THRESHOLD,
        }
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: defaults::TTS_LANGUAGE.to_string(),
            endpoint: None,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("indexes"),
            top_k: defaults::TOP_K,
        }
    }
}

impl Default for CorrectionsConfig {
    fn default() -> Self {
        Self { pairs: Vec::new() }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing, contains invalid TOML,
    /// or carries out-of-range values. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AryaError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                AryaError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Panics on invalid TOML or invalid values.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(AryaError::ConfigFileNotFound { .. }) => Self::default(),
            Err(e) => panic!("Failed to load config from {}: {}", path.display(), e),
        }
    }

    /// Reject values the pipeline cannot run with.
    fn validate(&self) -> Result<()> {
        if self.audio.sample_rate == 0 {
            return Err(AryaError::ConfigInvalidValue {
                key: "audio.sample_rate".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.audio.frame_samples == 0 {
            return Err(AryaError::ConfigInvalidValue {
                key: "audio.frame_samples".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.wake.listen_secs <= 0.0 {
            return Err(AryaError::ConfigInvalidValue {
                key: "wake.listen_secs".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.stt.english_ratio_threshold) {
            return Err(AryaError::ConfigInvalidValue {
                key: "stt.english_ratio_threshold".to_string(),
                message: "must be between 0.0 and 1.0".to_string(),
            });
        }
        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - ARYAVOICE_API_KEY → stt.api_key
    /// - ARYAVOICE_DEVICE → audio.device
    /// - ARYAVOICE_INDEX_DIR → index.dir
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("ARYAVOICE_API_KEY")
            && !key.is_empty()
        {
            self.stt.api_key = Some(key);
        }

        if let Ok(device) = std::env::var("ARYAVOICE_DEVICE")
            && let Ok(index) = device.parse::<usize>()
        {
            self.audio.device = Some(index);
        }

        if let Ok(dir) = std::env::var("ARYAVOICE_INDEX_DIR")
            && !dir.is_empty()
        {
            self.index.dir = PathBuf::from(dir);
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/aryavoice/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("aryavoice")
            .join("config.toml")
    }
}
