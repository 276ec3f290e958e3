use std::path::PathBuf;
use thiserror::Error;

use crate::audio::DecodeError;
use crate::storage::StorageError;

/// Failures while producing a waveform summary.
#[derive(Debug, Error)]
pub enum WaveformError {
    /// No stored asset exists for the identifier in any root.
    #[error("No sound found for id {id}")]
    NotFound { id: String },
    /// The stored asset could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Decoding produced no samples, so there is nothing to summarize.
    #[error("Audio contains no samples to summarize")]
    EmptyInput,
    /// A bucket count of zero was requested.
    #[error("Bucket count must be at least 1")]
    InvalidBucketCount,
    /// Reading the stored asset failed for a reason other than absence.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<StorageError> for WaveformError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound { id } | StorageError::InvalidId { id } => Self::NotFound { id },
            StorageError::AlreadyExists { path } => Self::Io {
                path,
                source: std::io::Error::from(std::io::ErrorKind::AlreadyExists),
            },
            StorageError::Io { path, source } => Self::Io { path, source },
        }
    }
}
