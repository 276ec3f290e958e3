use std::path::PathBuf;

use thiserror::Error;

use crate::app_dirs::AppDirError;

/// Failures while locating, loading or saving `soundpeaks.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The application directory holding the config could not be prepared.
    #[error(transparent)]
    AppDir(#[from] AppDirError),
    /// The config file exists but could not be read.
    #[error("Cannot read pipeline config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file or its parent directory could not be written.
    #[error("Cannot write pipeline config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`super::PipelineConfig`].
    #[error("Malformed pipeline config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// The settings could not be rendered as TOML.
    #[error("Cannot render pipeline config as TOML: {0}")]
    Render(#[from] toml::ser::Error),
}
