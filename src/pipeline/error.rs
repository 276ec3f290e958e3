use thiserror::Error;

use crate::audio::DecodeError;
use crate::storage::StorageError;
use crate::tags::MetadataError;
use crate::transcode::TranscodeError;

/// Reasons an upload was not stored.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The upload body was empty.
    #[error("Upload is empty")]
    EmptyUpload,
    /// Tags could not be read from the upload.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    /// The upload could not be converted to the canonical format.
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
    /// The converted asset could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IngestError {
    /// The underlying decode failure, when the upload was not readable audio.
    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            Self::Transcode(TranscodeError::Decode(error)) => Some(error),
            _ => None,
        }
    }
}
