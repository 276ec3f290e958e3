use thiserror::Error;

use crate::audio::DecodeError;

/// Failures while converting audio into the canonical format.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The input could not be decoded.
    #[error("Unable to decode input: {0}")]
    Decode(#[from] DecodeError),
    /// The input decoded to zero frames.
    #[error("Input contains no audio frames")]
    NoAudio,
    /// The source sample rate is outside the supported conversion range.
    #[error("Unsupported source sample rate {rate} Hz")]
    UnsupportedSampleRate { rate: u32 },
    /// The canonical container cannot carry this many channels.
    #[error("Unsupported channel count {channels}")]
    UnsupportedChannels { channels: usize },
    /// Writing the output container failed.
    #[error("Failed to encode output: {source}")]
    Encode { source: hound::Error },
}
