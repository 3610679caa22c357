//! The audio standardization transform.
//!
//! Converts any decodable recording into the corpus format: mono, 4000 Hz,
//! exactly 5 seconds, peak-normalized, 16-bit PCM WAV.

use crate::audio::{decode_recording, resample};
use crate::constants::{BITS_PER_SAMPLE, NORM_EPSILON, SAMPLE_RATE, TARGET_SAMPLES};
use crate::error::AudioError;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use std::path::Path;

/// Standardize one recording and write it to `output`.
///
/// Decode and channel mixdown happen in one pass, then the signal is
/// resampled to 4000 Hz, padded with trailing silence or truncated from the
/// start to exactly 20 000 samples, peak-normalized, and written as 16-bit
/// mono PCM WAV.
///
/// The WAV is encoded in memory and written with a single filesystem call,
/// so a failure never leaves a partial file behind.
///
/// # Errors
///
/// Any decode, resample, or write failure returns an [`AudioError`]; the
/// caller is expected to skip the recording and continue.
pub fn standardize(input: &Path, output: &Path) -> Result<(), AudioError> {
    let decoded = decode_recording(input)?;
    let samples = resample(decoded.samples, decoded.sample_rate, SAMPLE_RATE)?;
    let mut samples = fit_length(samples, TARGET_SAMPLES);
    peak_normalize(&mut samples);
    write_pcm16_wav(output, &samples)
}

/// Pad with trailing zeros or truncate from the start to exactly `target`
/// samples. Truncation always keeps the first `target` samples so the
/// transform is deterministic run-to-run.
fn fit_length(mut samples: Vec<f32>, target: usize) -> Vec<f32> {
    samples.resize(target, 0.0);
    samples
}

/// Scale so the peak absolute amplitude is 1.0. The epsilon keeps an
/// all-zero signal all-zero instead of dividing by zero.
fn peak_normalize(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    let scale = 1.0 / (peak + NORM_EPSILON);
    for sample in samples {
        *sample *= scale;
    }
}

/// Encode samples as 16-bit mono PCM WAV and write atomically.
fn write_pcm16_wav(path: &Path, samples: &[f32]) -> Result<(), AudioError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).map_err(|e| AudioError::Encode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        for &sample in samples {
            #[allow(clippy::cast_possible_truncation)]
            let quantized = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
            writer
                .write_sample(quantized)
                .map_err(|e| AudioError::Encode {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                })?;
        }

        writer.finalize().map_err(|e| AudioError::Encode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
    }

    std::fs::write(path, cursor.into_inner()).map_err(|e| {
        // Don't leave a truncated file behind
        let _ = std::fs::remove_file(path);
        AudioError::Encode {
            path: path.to_path_buf(),
            source: Box::new(e),
        }
    })
}
