//! In-memory WAV encoding for cloud recognition requests.

use crate::error::{AryaError, Result};
use std::io::Cursor;

/// Encode 16-bit PCM mono samples as a WAV byte buffer.
///
/// The cloud recognizer takes LINEAR16 WAV content, so the header must
/// carry the true sample rate.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer =
        hound::WavWriter::new(&mut cursor, spec).map_err(|e| AryaError::AudioCapture {
            message: format!("Failed to create WAV writer: {}", e),
        })?;

    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| AryaError::AudioCapture {
                message: format!("Failed to write WAV sample: {}", e),
            })?;
    }

    writer.finalize().map_err(|e| AryaError::AudioCapture {
        message: format!("Failed to finalize WAV data: {}", e),
    })?;

    Ok(cursor.into_inner())
}

/// Simple linear interpolation resampling.
pub fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_wav_round_trips_through_hound() {
        let samples = vec![100i16, -200, 300, -400, 500];
        let bytes = encode_wav(&samples, 16000).unwrap();

        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.bits_per_sample, 16);

        let decoded: Vec<i16> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn encode_wav_empty_input_is_valid_wav() {
        let bytes = encode_wav(&[], 16000).unwrap();

        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.len(), 0);
    }

    #[test]
    fn encode_wav_carries_configured_sample_rate() {
        let bytes = encode_wav(&[0i16; 10], 44100).unwrap();
        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().sample_rate, 44100);
    }

    #[test]
    fn resample_identity_same_rate() {
        let samples = vec![100i16, 200, 300, 400, 500];
        let resampled = resample(&samples, 16000, 16000);

        assert_eq!(resampled, samples);
    }

    #[test]
    fn resample_upsample_verification() {
        let samples = vec![0i16, 1000, 2000];
        let resampled = resample(&samples, 8000, 16000);

        // Upsampling from 8kHz to 16kHz should double the sample count
        assert_eq!(resampled.len(), 6);

        // Values should be interpolated
        assert_eq!(resampled[0], 0);
        assert!(resampled[1] > 0 && resampled[1] < 1000);
        assert_eq!(resampled[2], 1000);
    }

    #[test]
    fn resample_downsample_verification() {
        let samples = vec![0i16; 3200]; // 200ms at 16kHz
        let resampled = resample(&samples, 16000, 8000);

        assert_eq!(resampled.len(), 1600);
    }

    #[test]
    fn resample_handles_edge_cases() {
        // Empty input
        let empty = resample(&[], 16000, 8000);
        assert_eq!(empty.len(), 0);

        // Single sample
        let single = resample(&[100i16], 16000, 8000);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0], 100);
    }

    #[test]
    fn resample_preserves_signal_amplitude() {
        let samples = vec![1000i16; 100];
        let resampled = resample(&samples, 16000, 8000);

        assert!(resampled.iter().all(|&s| (999..=1001).contains(&s)));
    }
}
