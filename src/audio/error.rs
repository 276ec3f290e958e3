use thiserror::Error;

/// Reasons an audio payload could not be turned into PCM.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload is not a recognized container or holds no audio track.
    #[error("Invalid audio: {message}")]
    Invalid { message: String },
    /// WAV sample data is truncated or corrupt.
    #[error("Sample error: {source}")]
    Sample { source: hound::Error },
    /// The codec failed while decoding the stream.
    #[error("Codec error: {message}")]
    Codec { message: String },
    /// A decoded sample was NaN or infinite.
    #[error("Non-finite sample at channel {channel}, index {index}")]
    NonFinite { channel: usize, index: usize },
}
