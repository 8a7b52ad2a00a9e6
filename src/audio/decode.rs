//! Audio file decoding to 16kHz mono f32.
//!
//! WAV files are read with hound; every other container (mp3, flac, ogg,
//! m4a, ...) goes through symphonia. Multi-channel audio is averaged to mono
//! and other sample rates are resampled to [`SAMPLE_RATE`].

use crate::defaults::SAMPLE_RATE;
use crate::error::{AvatarError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

fn decode_error(message: impl Into<String>) -> AvatarError {
    AvatarError::AudioDecode {
        message: message.into(),
    }
}

/// Decode an audio file into 16kHz mono samples in [-1.0, 1.0].
///
/// Fails on missing files, unreadable or corrupt data, and audio that
/// decodes to zero samples.
pub fn decode_file(path: &Path) -> Result<Vec<f32>> {
    let file = File::open(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    tracing::debug!(path = %path.display(), ?extension, "decoding audio");

    let samples = match extension.as_deref() {
        Some("wav") | Some("wave") => decode_wav(std::io::BufReader::new(file))?,
        ext => decode_media(Box::new(file), ext)?,
    };

    if samples.is_empty() {
        return Err(decode_error(format!(
            "no audio samples decoded from {}",
            path.display()
        )));
    }

    Ok(samples)
}

/// Decode WAV data from any reader.
pub fn decode_wav<R: Read>(reader: R) -> Result<Vec<f32>> {
    let mut wav_reader = hound::WavReader::new(reader)
        .map_err(|e| decode_error(format!("Failed to parse WAV file: {e}")))?;

    let spec = wav_reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => wav_reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| decode_error(format!("Failed to read WAV samples: {e}")))?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            wav_reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| decode_error(format!("Failed to read WAV samples: {e}")))?
        }
    };

    let mono = downmix(&interleaved, spec.channels as usize);
    Ok(resample(&mono, spec.sample_rate, SAMPLE_RATE))
}

/// Decode any container symphonia can probe.
///
/// `extension` is only a hint; the probe also inspects the data itself.
pub fn decode_media(source: Box<dyn MediaSource>, extension: Option<&str>) -> Result<Vec<f32>> {
    let mss = MediaSourceStream::new(source, Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decode_error(format!("probe failed: {e}")))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| decode_error("no audio track found"))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let source_rate = codec_params.sample_rate.unwrap_or(SAMPLE_RATE);

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| decode_error(format!("codec init failed: {e}")))?;

    let mut mono: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(decode_error(format!("packet read: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // A single damaged frame is skipped; a file with nothing but
            // damaged frames still fails on the empty check in decode_file.
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::debug!(error = e, "skipping undecodable packet");
                continue;
            }
            Err(e) => return Err(decode_error(format!("decode: {e}"))),
        };

        let spec = *decoded.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        mono.extend(downmix(sample_buf.samples(), spec.channels.count()));
    }

    Ok(resample(&mono, source_rate, SAMPLE_RATE))
}

/// Average interleaved frames down to one channel.
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Simple linear interpolation resampling.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = (source_pos - source_idx as f64) as f32;

            match (samples.get(source_idx), samples.get(source_idx + 1)) {
                (Some(&left), Some(&right)) => left + (right - left) * fraction,
                (Some(&left), None) => left,
                _ => samples[samples.len() - 1],
            }
        })
        .collect()
}

/// Seekable in-memory media source, for decoding bytes already in memory.
pub fn media_from_bytes(bytes: Vec<u8>) -> Box<dyn MediaSource> {
    Box::new(std::io::Cursor::new(bytes))
}
