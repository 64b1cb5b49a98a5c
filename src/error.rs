//! Error types for aryavoice.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AryaError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio capture errors
    #[error("Audio device not found: {device}")]
    DeviceNotFound { device: String },

    #[error("Sample rate mismatch: recognizer expects {expected} Hz, capture delivers {actual} Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },

    #[error("Audio capture failed: {message}")]
    AudioCapture { message: String },

    // Recognition errors
    #[error("Speech recognizer unavailable: {message}")]
    RecognizerUnavailable { message: String },

    #[error("Transcription failed: {message}")]
    TranscriptionFailure { message: String },

    // Playback errors
    #[error("Speech synthesis failed: {message}")]
    SynthesisFailure { message: String },

    #[error("Audio playback failed: {message}")]
    Playback { message: String },

    // Retrieval index errors
    #[error("Retrieval index not found at {path}")]
    IndexNotFound { path: String },

    #[error("Failed to parse retrieval index: {message}")]
    IndexParse { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, AryaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = AryaError::ConfigFileNotFound {
            path: "/path/to/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/config.toml"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = AryaError::ConfigInvalidValue {
            key: "listen_secs".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for listen_secs: must be positive"
        );
    }

    #[test]
    fn test_device_not_found_display() {
        let error = AryaError::DeviceNotFound {
            device: "3".to_string(),
        };
        assert_eq!(error.to_string(), "Audio device not found: 3");
    }

    #[test]
    fn test_sample_rate_mismatch_display() {
        let error = AryaError::SampleRateMismatch {
            expected: 16000,
            actual: 44100,
        };
        assert_eq!(
            error.to_string(),
            "Sample rate mismatch: recognizer expects 16000 Hz, capture delivers 44100 Hz"
        );
    }

    #[test]
    fn test_audio_capture_display() {
        let error = AryaError::AudioCapture {
            message: "buffer overflow".to_string(),
        };
        assert_eq!(error.to_string(), "Audio capture failed: buffer overflow");
    }

    #[test]
    fn test_recognizer_unavailable_display() {
        let error = AryaError::RecognizerUnavailable {
            message: "missing API key".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Speech recognizer unavailable: missing API key"
        );
    }

    #[test]
    fn test_transcription_failure_display() {
        let error = AryaError::TranscriptionFailure {
            message: "request timed out".to_string(),
        };
        assert_eq!(error.to_string(), "Transcription failed: request timed out");
    }

    #[test]
    fn test_synthesis_failure_display() {
        let error = AryaError::SynthesisFailure {
            message: "endpoint returned 503".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Speech synthesis failed: endpoint returned 503"
        );
    }

    #[test]
    fn test_playback_display() {
        let error = AryaError::Playback {
            message: "no output device".to_string(),
        };
        assert_eq!(error.to_string(), "Audio playback failed: no output device");
    }

    #[test]
    fn test_index_not_found_display() {
        let error = AryaError::IndexNotFound {
            path: "/data/indexes".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Retrieval index not found at /data/indexes"
        );
    }

    #[test]
    fn test_index_parse_display() {
        let error = AryaError::IndexParse {
            message: "line 4: invalid JSON".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse retrieval index: line 4: invalid JSON"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: AryaError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: AryaError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);

        fn returns_error() -> Result<i32> {
            Err(AryaError::ConfigFileNotFound {
                path: "/nowhere/config.toml".to_string(),
            })
        }
        assert!(returns_error().is_err());
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: AryaError = io_error.into();

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<AryaError>();
        assert_sync::<AryaError>();
    }

    #[test]
    fn test_error_debug_format() {
        let error = AryaError::DeviceNotFound {
            device: "usb-mic".to_string(),
        };
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("DeviceNotFound"));
        assert!(debug_str.contains("usb-mic"));
    }
}
