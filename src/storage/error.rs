use std::path::PathBuf;
use thiserror::Error;

/// Failures while locating, reading or persisting stored assets.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The identifier is not a well-formed asset token.
    #[error("Invalid sound id {id:?}")]
    InvalidId { id: String },
    /// No root holds an asset for the identifier.
    #[error("No sound found for id {id}")]
    NotFound { id: String },
    /// An asset already exists where a new one was to be written.
    #[error("Sound already stored at {path}")]
    AlreadyExists { path: PathBuf },
    /// Any other filesystem failure.
    #[error("Storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
