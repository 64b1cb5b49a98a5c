//! Cancellable audio playback on the default output device.

use crate::error::{AryaError, Result};
use crate::tts::speech::SpeakHandle;
use crate::tts::synth::DecodedAudio;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Plays decoded audio to the default output device.
///
/// The poll loop watches the utterance handle, so cancellation from
/// another thread tears the stream down within one poll interval.
pub struct AudioPlayback;

impl AudioPlayback {
    /// Plays `audio` to completion or until `handle` is cancelled.
    ///
    /// Marks the handle finished on natural completion; cancellation is
    /// left to the caller who cancelled.
    pub fn play(audio: &DecodedAudio, handle: &SpeakHandle) -> Result<()> {
        if audio.samples.is_empty() {
            handle.mark_finished();
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host.default_output_device().ok_or_else(|| AryaError::Playback {
            message: "no output device available".to_string(),
        })?;

        let config = output_config(&device, audio.sample_rate)?;
        let channels = config.channels as usize;

        let samples = Arc::new(audio.samples.clone());
        let position = Arc::new(AtomicUsize::new(0));

        let callback_samples = Arc::clone(&samples);
        let callback_position = Arc::clone(&position);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut pos = callback_position.load(Ordering::Relaxed);
                    for frame in data.chunks_mut(channels) {
                        let sample = callback_samples.get(pos).copied().unwrap_or(0.0);
                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                        if pos < callback_samples.len() {
                            pos += 1;
                        }
                    }
                    callback_position.store(pos, Ordering::Relaxed);
                },
                |err| {
                    eprintln!("aryavoice: playback stream error: {err}");
                },
                None,
            )
            .map_err(|e| AryaError::Playback {
                message: e.to_string(),
            })?;

        stream.play().map_err(|e| AryaError::Playback {
            message: e.to_string(),
        })?;

        let total = samples.len();
        let duration_ms = total as u64 * 1000 / u64::from(audio.sample_rate);
        let deadline = Instant::now() + Duration::from_millis(duration_ms + 500);

        while position.load(Ordering::Relaxed) < total {
            if handle.is_cancelled() {
                drop(stream);
                return Ok(());
            }
            if Instant::now() >= deadline {
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }

        // Let the device drain its last buffer before tearing down
        std::thread::sleep(Duration::from_millis(100));
        drop(stream);
        handle.mark_finished();
        Ok(())
    }
}

fn output_config(device: &cpal::Device, sample_rate: u32) -> Result<StreamConfig> {
    let supported = device
        .supported_output_configs()
        .map_err(|e| AryaError::Playback {
            message: e.to_string(),
        })?
        .find(|c| {
            c.channels() == 1
                && c.min_sample_rate() <= SampleRate(sample_rate)
                && c.max_sample_rate() >= SampleRate(sample_rate)
        })
        .or_else(|| {
            device.supported_output_configs().ok()?.find(|c| {
                c.channels() == 2
                    && c.min_sample_rate() <= SampleRate(sample_rate)
                    && c.max_sample_rate() >= SampleRate(sample_rate)
            })
        })
        .ok_or_else(|| AryaError::Playback {
            message: format!("no output config supports {} Hz", sample_rate),
        })?;

    Ok(supported.with_sample_rate(SampleRate(sample_rate)).config())
}
