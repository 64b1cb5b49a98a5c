use crate::defaults;
use crate::error::{AryaError, Result};

/// Trait for audio source devices.
///
/// This trait allows swapping implementations (real audio device vs mock).
pub trait AudioSource: Send {
    /// Start capturing audio from the source.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing audio from the source.
    fn stop(&mut self) -> Result<()>;

    /// Read whatever audio has accumulated since the last read.
    ///
    /// # Returns
    /// Vector of 16-bit PCM mono samples, possibly empty, or an error
    fn read_samples(&mut self) -> Result<Vec<i16>>;

    /// The sample rate this source delivers samples at.
    ///
    /// Checked against the recognizer's rate when the pipeline is wired up.
    fn sample_rate(&self) -> u32;
}

/// Configuration for audio source initialization
#[derive(Debug, Clone)]
pub struct AudioSourceConfig {
    /// Input device index; None picks the system default.
    pub device: Option<usize>,
    pub sample_rate: u32,
    pub frame_samples: usize,
}

impl Default for AudioSourceConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: defaults::SAMPLE_RATE,
            frame_samples: defaults::FRAME_SAMPLES,
        }
    }
}

/// Mock audio source for testing.
///
/// Plays back a script of frames, one per `read_samples` call, then
/// returns silence forever.
#[derive(Debug, Clone)]
pub struct MockAudioSource {
    is_started: bool,
    frames: Vec<Vec<i16>>,
    next_frame: usize,
    sample_rate: u32,
    should_fail_start: bool,
    should_fail_stop: bool,
    should_fail_read: bool,
    error_message: String,
}

impl MockAudioSource {
    /// Create a new mock audio source with default settings
    pub fn new() -> Self {
        Self {
            is_started: false,
            frames: vec![vec![0i16; 160]],
            next_frame: 0,
            sample_rate: defaults::SAMPLE_RATE,
            should_fail_start: false,
            should_fail_stop: false,
            should_fail_read: false,
            error_message: "mock audio error".to_string(),
        }
    }

    /// Configure the mock to return one specific frame repeatedly
    pub fn with_samples(mut self, samples: Vec<i16>) -> Self {
        self.frames = vec![samples];
        self.next_frame = 0;
        self
    }

    /// Configure the mock to play a script of frames in order.
    ///
    /// After the script runs out, reads return silence.
    pub fn with_frames(mut self, frames: Vec<Vec<i16>>) -> Self {
        self.frames = frames;
        self.next_frame = 0;
        self
    }

    /// Configure the reported sample rate
    pub fn with_sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Configure the mock to fail on start
    pub fn with_start_failure(mut self) -> Self {
        self.should_fail_start = true;
        self
    }

    /// Configure the mock to fail on stop
    pub fn with_stop_failure(mut self) -> Self {
        self.should_fail_stop = true;
        self
    }

    /// Configure the mock to fail on read
    pub fn with_read_failure(mut self) -> Self {
        self.should_fail_read = true;
        self
    }

    /// Configure the error message for failures
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    /// Check if the audio source is started
    pub fn is_started(&self) -> bool {
        self.is_started
    }
}

impl Default for MockAudioSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSource for MockAudioSource {
    fn start(&mut self) -> Result<()> {
        if self.should_fail_start {
            Err(AryaError::AudioCapture {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = true;
            Ok(())
        }
    }

    fn stop(&mut self) -> Result<()> {
        if self.should_fail_stop {
            Err(AryaError::AudioCapture {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = false;
            Ok(())
        }
    }

    fn read_samples(&mut self) -> Result<Vec<i16>> {
        if self.should_fail_read {
            return Err(AryaError::AudioCapture {
                message: self.error_message.clone(),
            });
        }
        if self.frames.len() == 1 {
            // Single-frame mocks repeat forever, matching a steady source
            return Ok(self.frames[0].clone());
        }
        let frame = match self.frames.get(self.next_frame) {
            Some(frame) => frame.clone(),
            None => vec![0i16; 160],
        };
        self.next_frame += 1;
        Ok(frame)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
