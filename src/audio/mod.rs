//! Audio capture: the `AudioSource` trait, the cpal-backed implementation,
//! device enumeration, and WAV encoding helpers.

#[cfg(feature = "cpal-audio")]
pub mod capture;
pub mod source;
pub mod wav;

pub use source::{AudioSource, AudioSourceConfig, MockAudioSource};

#[cfg(feature = "cpal-audio")]
pub use capture::{CpalAudioSource, InputDevice, list_input_devices, suppress_audio_warnings};
