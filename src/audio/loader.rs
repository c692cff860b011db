use hound::WavReader;
use std::path::Path;
use tracing::{debug, info};

use crate::error::TranscribeError;

/// Sample rate Whisper expects
const TARGET_SAMPLE_RATE: u32 = 16000;

/// Loads an audio file and returns 16kHz mono f32 samples ready for inference
///
/// Integer PCM is normalized to [-1.0, 1.0], multi-channel audio is
/// downmixed by averaging, and anything not already at 16kHz is
/// resampled by linear interpolation.
///
/// # Errors
/// Returns [`TranscribeError::AudioUnreadable`] if the file cannot be
/// opened, and [`TranscribeError::DecodeFailure`] if its contents cannot
/// be parsed as WAV/PCM.
pub fn load_audio(path: &Path) -> Result<Vec<f32>, TranscribeError> {
    let reader = WavReader::open(path).map_err(|e| match e {
        hound::Error::IoError(io) => TranscribeError::AudioUnreadable {
            path: path.display().to_string(),
            source: io.into(),
        },
        other => TranscribeError::DecodeFailure {
            path: path.display().to_string(),
            source: other.into(),
        },
    })?;

    let spec = reader.spec();
    debug!(
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        bits = spec.bits_per_sample,
        "decoding audio file"
    );

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| TranscribeError::DecodeFailure {
                path: path.display().to_string(),
                source: e.into(),
            })?,
        hound::SampleFormat::Int => {
            // Normalize by the full scale of the source bit depth
            #[allow(clippy::cast_precision_loss)]
            let max_val = (1_u32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| TranscribeError::DecodeFailure {
                    path: path.display().to_string(),
                    source: e.into(),
                })?
        }
    };

    let mono = downmix_to_mono(&samples, spec.channels);
    let resampled = resample(&mono, spec.sample_rate, TARGET_SAMPLE_RATE);

    info!(
        path = %path.display(),
        input_samples = samples.len(),
        output_samples = resampled.len(),
        "audio loaded"
    );

    Ok(resampled)
}

/// Averages interleaved channels into a single mono channel
fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    let channels_f64 = f64::from(channels);
    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum_f64: f64 = frame.iter().map(|&s| f64::from(s)).sum();
            // f64 → f32: audio samples are stored as f32, precision sufficient
            #[allow(clippy::cast_possible_truncation)]
            {
                (sum_f64 / channels_f64) as f32
            }
        })
        .collect()
}

/// Linear interpolation resampling
///
/// Algorithm requires f64 ↔ usize conversions for fractional index calculations
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = f64::from(source_rate) / f64::from(target_rate);

    // Output length - ratio is always positive for valid sample rates
    let output_len_f64 = (samples.len() as f64) / ratio;
    let output_len = if output_len_f64.is_finite() && output_len_f64 >= 0.0 {
        output_len_f64.ceil() as usize
    } else {
        samples.len()
    };

    let mut resampled = Vec::with_capacity(output_len);
    for i in 0..output_len {
        let src_idx_f64 = (i as f64) * ratio;

        // Floor gives integer part, safe because src_idx >= 0
        let src_idx_floor = if src_idx_f64 >= 0.0 && src_idx_f64 < (usize::MAX as f64) {
            src_idx_f64.floor() as usize
        } else {
            0
        };

        let src_idx_ceil = (src_idx_floor + 1).min(samples.len().saturating_sub(1));
        let fract = src_idx_f64 - src_idx_f64.floor();

        let sample = if src_idx_floor < samples.len() {
            let s1 = f64::from(samples[src_idx_floor]);
            let s2 = f64::from(samples[src_idx_ceil]);
            let interpolated = s1.mul_add(1.0 - fract, s2 * fract);
            interpolated as f32
        } else {
            0.0_f32
        };

        resampled.push(sample);
    }

    debug!(
        source_rate,
        target_rate,
        input_samples = samples.len(),
        output_samples = resampled.len(),
        "resampling completed"
    );

    resampled
}
