//! Audio resampling using rubato.

use crate::error::AudioError;
use audioadapter_buffers::direct::SequentialSlice;
use rubato::{Fft, FixedSync, Resampler};

const CHUNK_SIZE: usize = 1024;

/// Resample mono audio to the target sample rate.
///
/// Returns the input unchanged if already at the target rate.
pub fn resample(samples: Vec<f32>, from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioError> {
    if from_rate == to_rate {
        return Ok(samples);
    }

    let channels = 1;
    let mut resampler = Fft::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_SIZE,
        1,
        channels,
        FixedSync::Both,
    )
    .map_err(|e| AudioError::Resample {
        reason: e.to_string(),
    })?;

    let frames_per_chunk = resampler.input_frames_next();
    let mut output = Vec::with_capacity(estimate_output_len(samples.len(), from_rate, to_rate));

    // Full chunks
    let mut pos = 0;
    while pos + frames_per_chunk <= samples.len() {
        let chunk = &samples[pos..pos + frames_per_chunk];
        output.extend(process_chunk(&mut resampler, chunk, frames_per_chunk)?);
        pos += frames_per_chunk;
    }

    // Final partial chunk, zero-padded to a full chunk; only the
    // proportional share of the output is real signal.
    if pos < samples.len() {
        let remaining = samples.len() - pos;
        let mut padded = samples[pos..].to_vec();
        padded.resize(frames_per_chunk, 0.0);

        let resampled = process_chunk(&mut resampler, &padded, frames_per_chunk)?;

        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let real_frames =
            (remaining as f64 * f64::from(to_rate) / f64::from(from_rate)).ceil() as usize;
        let take_count = real_frames.min(resampled.len());
        output.extend_from_slice(&resampled[..take_count]);
    }

    Ok(output)
}

/// Run one fixed-size chunk through the resampler.
fn process_chunk(
    resampler: &mut Fft<f32>,
    chunk: &[f32],
    frames: usize,
) -> Result<Vec<f32>, AudioError> {
    let input = SequentialSlice::new(chunk, 1, frames).map_err(|e| AudioError::Resample {
        reason: format!("failed to create input adapter: {e}"),
    })?;

    let resampled = resampler
        .process(&input, 0, None)
        .map_err(|e| AudioError::Resample {
            reason: e.to_string(),
        })?;

    Ok(resampled.take_data())
}

/// Estimate output length after resampling.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn estimate_output_len(input_len: usize, from_rate: u32, to_rate: u32) -> usize {
    ((input_len as f64) * f64::from(to_rate) / f64::from(from_rate)).ceil() as usize + CHUNK_SIZE
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_same_rate_returns_input() {
        let samples = vec![0.1, 0.2, 0.3, 0.4, 0.5];
        let result = resample(samples.clone(), 4000, 4000);
        assert_eq!(result.unwrap(), samples);
    }

    #[test]
    fn test_resample_empty_input() {
        let result = resample(Vec::new(), 44100, 4000).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_resample_downsample_to_target_rate() {
        #[allow(clippy::cast_precision_loss)]
        let samples: Vec<f32> = (0..44100).map(|i| (i as f32 * 0.001).sin()).collect();
        let output = resample(samples, 44100, 4000).unwrap();
        // One second of input should yield roughly one second of output
        assert!(output.len() > 3600);
        assert!(output.len() < 4400);
    }

    #[test]
    fn test_resample_upsample() {
        #[allow(clippy::cast_precision_loss)]
        let samples: Vec<f32> = (0..2000).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resample(samples, 2000, 4000).unwrap();
        assert!(output.len() > 3600);
        assert!(output.len() < 4400);
    }
}
