//! Audio decoding using symphonia.
//!
//! Decoding and channel mixdown happen in one pass: packets are mixed to
//! mono as they are decoded, so no multi-channel buffer ever reaches the
//! rest of the pipeline.

use crate::error::AudioError;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Mono audio at its native sample rate.
#[derive(Debug, Clone)]
pub struct DecodedRecording {
    /// Samples as mono f32 in range [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Native sample rate in Hz.
    pub sample_rate: u32,
}

/// Decode an audio file to mono f32 samples at its native rate.
///
/// Supports any container/codec enabled in the symphonia build
/// (WAV, FLAC, MP3, AAC, PCM).
pub fn decode_recording(path: &Path) -> Result<DecodedRecording, AudioError> {
    let file = File::open(path).map_err(|e| AudioError::Open {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioError::Open {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::NoAudioTracks {
            path: path.to_path_buf(),
        })?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AudioError::Decode {
            path: path.to_path_buf(),
            source: "missing sample rate".into(),
        })?;
    let channels = track
        .codec_params
        .channels
        .map_or(1, symphonia::core::audio::Channels::count);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::Decode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(AudioError::Decode {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).map_err(|e| AudioError::Decode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        mix_to_mono(&decoded, channels, &mut samples).map_err(|message| AudioError::Decode {
            path: path.to_path_buf(),
            source: message.into(),
        })?;
    }

    Ok(DecodedRecording {
        samples,
        sample_rate,
    })
}

/// Mix a decoded buffer down to mono and append to `output`.
///
/// An unhandled sample format is an error, not a skip: dropping packets
/// here would turn a valid recording into silence without anyone noticing.
#[allow(clippy::cast_precision_loss)]
fn mix_to_mono(
    buffer: &AudioBufferRef,
    channels: usize,
    output: &mut Vec<f32>,
) -> Result<(), &'static str> {
    const I8_NORM: f32 = 128.0;
    const I16_NORM: f32 = 32768.0;
    const I24_NORM: f32 = 8_388_608.0;
    const I32_NORM: f32 = 2_147_483_648.0;

    match buffer {
        AudioBufferRef::U8(buf) => {
            mix_planes(buf.frames(), channels, output, |ch, i| {
                (f32::from(buf.chan(ch)[i]) - I8_NORM) / I8_NORM
            });
        }
        AudioBufferRef::U16(buf) => {
            mix_planes(buf.frames(), channels, output, |ch, i| {
                (f32::from(buf.chan(ch)[i]) - I16_NORM) / I16_NORM
            });
        }
        AudioBufferRef::S8(buf) => {
            mix_planes(buf.frames(), channels, output, |ch, i| {
                f32::from(buf.chan(ch)[i]) / I8_NORM
            });
        }
        AudioBufferRef::S16(buf) => {
            mix_planes(buf.frames(), channels, output, |ch, i| {
                f32::from(buf.chan(ch)[i]) / I16_NORM
            });
        }
        AudioBufferRef::S24(buf) => {
            mix_planes(buf.frames(), channels, output, |ch, i| {
                buf.chan(ch)[i].inner() as f32 / I24_NORM
            });
        }
        AudioBufferRef::S32(buf) => {
            mix_planes(buf.frames(), channels, output, |ch, i| {
                buf.chan(ch)[i] as f32 / I32_NORM
            });
        }
        AudioBufferRef::F32(buf) => {
            mix_planes(buf.frames(), channels, output, |ch, i| buf.chan(ch)[i]);
        }
        AudioBufferRef::F64(buf) => {
            #[allow(clippy::cast_possible_truncation)]
            mix_planes(buf.frames(), channels, output, |ch, i| {
                buf.chan(ch)[i] as f32
            });
        }
        _ => return Err("unsupported sample format"),
    }

    Ok(())
}

/// Average per-frame samples across channels.
fn mix_planes(
    frames: usize,
    channels: usize,
    output: &mut Vec<f32>,
    sample_at: impl Fn(usize, usize) -> f32,
) {
    output.reserve(frames);
    if channels <= 1 {
        for i in 0..frames {
            output.push(sample_at(0, i));
        }
        return;
    }

    #[allow(clippy::cast_precision_loss)]
    let scale = 1.0 / channels as f32;
    for i in 0..frames {
        let mut sum = 0.0f32;
        for ch in 0..channels {
            sum += sample_at(ch, i);
        }
        output.push(sum * scale);
    }
}
