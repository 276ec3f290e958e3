//! Decoding of encoded audio into planar floating-point PCM.

mod decoder;
mod error;
pub(crate) mod symphonia_reader;
mod wav_reader;

pub use decoder::AudioDecoder;
pub use error::DecodeError;

/// Decoded audio held as one sample vector per channel.
///
/// Samples are nominally in `[-1.0, 1.0]`; decoders reject non-finite values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PcmBuffer {
    /// Planar samples, one equally long vector per channel.
    pub channels: Vec<Vec<f32>>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl PcmBuffer {
    /// Build a buffer from planar channel data.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
        }
    }

    /// Build a buffer from interleaved samples.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[f32], channel_count: usize, sample_rate: u32) -> Self {
        let channel_count = channel_count.max(1);
        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Self::new(channels, sample_rate)
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of complete frames (the shortest channel wins).
    pub fn frames(&self) -> usize {
        self.channels.iter().map(Vec::len).min().unwrap_or(0)
    }

    /// True when there is no sample data to reduce or encode.
    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Interleave the complete frames into a single vector.
    pub fn interleaved(&self) -> Vec<f32> {
        let frames = self.frames();
        let mut out = Vec::with_capacity(frames * self.channel_count());
        for index in 0..frames {
            out.extend(self.channels.iter().map(|channel| channel[index]));
        }
        out
    }

    pub(crate) fn ensure_finite(&self) -> Result<(), DecodeError> {
        for (channel, samples) in self.channels.iter().enumerate() {
            if let Some(index) = samples.iter().position(|sample| !sample.is_finite()) {
                return Err(DecodeError::NonFinite { channel, index });
            }
        }
        Ok(())
    }
}

/// Turns an encoded audio payload into PCM.
///
/// Implementations are pure transforms and must be usable from many threads.
pub trait SampleDecoder: Send + Sync {
    /// Decode `bytes` into planar PCM.
    fn decode(&self, bytes: &[u8]) -> Result<PcmBuffer, DecodeError>;
}
