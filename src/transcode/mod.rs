//! Conversion of uploads into the single canonical distribution format.

mod error;
mod resample;

use std::io::Cursor;
use std::sync::Arc;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::audio::{AudioDecoder, PcmBuffer, SampleDecoder};

pub use error::TranscodeError;

/// Largest channel count written to the canonical container.
pub const MAX_CHANNELS: usize = 8;
/// Lowest source sample rate accepted for conversion, in Hz.
pub const MIN_SOURCE_RATE: u32 = 8_000;
/// Highest source sample rate accepted for conversion, in Hz.
pub const MAX_SOURCE_RATE: u32 = 384_000;

/// Codec, container and rate every stored asset uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalFormat {
    /// File extension of stored assets.
    pub extension: &'static str,
    /// MIME type served for stored assets.
    pub mime_type: &'static str,
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per signed integer PCM sample.
    pub bits_per_sample: u16,
}

/// The system-wide storage format: 16-bit PCM WAV at 44.1 kHz.
pub const CANONICAL_FORMAT: CanonicalFormat = CanonicalFormat {
    extension: "wav",
    mime_type: "audio/wav",
    sample_rate: 44_100,
    bits_per_sample: 16,
};

/// Converts arbitrary input audio into a target format.
pub trait Transcoder: Send + Sync {
    /// Encode `bytes` as `target`.
    fn transcode(&self, bytes: &[u8], target: &CanonicalFormat) -> Result<Vec<u8>, TranscodeError>;
}

/// Decodes with a [`SampleDecoder`] and re-encodes as integer PCM WAV.
#[derive(Clone)]
pub struct WavTranscoder {
    decoder: Arc<dyn SampleDecoder>,
}

impl WavTranscoder {
    /// Transcoder decoding input with `decoder`.
    pub fn new(decoder: Arc<dyn SampleDecoder>) -> Self {
        Self { decoder }
    }
}

impl Default for WavTranscoder {
    fn default() -> Self {
        Self::new(Arc::new(AudioDecoder::new()))
    }
}

impl Transcoder for WavTranscoder {
    fn transcode(&self, bytes: &[u8], target: &CanonicalFormat) -> Result<Vec<u8>, TranscodeError> {
        let pcm = self.decoder.decode(bytes)?;
        if pcm.is_empty() {
            return Err(TranscodeError::NoAudio);
        }
        let channels = pcm.channel_count();
        if channels > MAX_CHANNELS {
            return Err(TranscodeError::UnsupportedChannels { channels });
        }
        let encoded = encode_pcm(&pcm, target)?;
        tracing::debug!(
            input_bytes = bytes.len(),
            output_bytes = encoded.len(),
            source_rate = pcm.sample_rate,
            channels,
            "Transcoded upload"
        );
        Ok(encoded)
    }
}

/// Resample and quantize `pcm` into a WAV payload for `target`.
///
/// Source rates outside `MIN_SOURCE_RATE..=MAX_SOURCE_RATE` are rejected.
pub fn encode_pcm(pcm: &PcmBuffer, target: &CanonicalFormat) -> Result<Vec<u8>, TranscodeError> {
    let channels = pcm.channel_count();
    let source_rate = pcm.sample_rate;
    if !(MIN_SOURCE_RATE..=MAX_SOURCE_RATE).contains(&source_rate) {
        return Err(TranscodeError::UnsupportedSampleRate { rate: source_rate });
    }
    let samples = resample::resample_linear(
        &pcm.interleaved(),
        channels,
        source_rate,
        target.sample_rate,
    );

    let spec = WavSpec {
        channels: channels as u16,
        sample_rate: target.sample_rate,
        bits_per_sample: target.bits_per_sample,
        sample_format: SampleFormat::Int,
    };
    let scale = ((1i64 << target.bits_per_sample.saturating_sub(1)) - 1).max(1) as f32;
    let mut cursor = Cursor::new(Vec::with_capacity(samples.len() * 2 + 44));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|source| TranscodeError::Encode { source })?;
        for sample in samples {
            let quantized = (sample.clamp(-1.0, 1.0) * scale).round() as i32;
            writer
                .write_sample(quantized)
                .map_err(|source| TranscodeError::Encode { source })?;
        }
        writer
            .finalize()
            .map_err(|source| TranscodeError::Encode { source })?;
    }
    Ok(cursor.into_inner())
}
