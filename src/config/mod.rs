//! Pipeline settings persisted as TOML.
//!
//! Config keys: `upload_root`, `seed_roots`, `waveform.bucket_count`,
//! `waveform.bucket_mode`, `waveform.cache_capacity`, `logging.filter`,
//! `logging.max_files`.

mod defaults;
mod error;
mod io;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app_dirs;
use crate::waveform::{BucketMode, ReduceOptions};

pub use error::ConfigError;
pub use io::{CONFIG_FILE_NAME, config_path, load_from, load_or_default, save_to_path};

use defaults::{
    clamp_bucket_count, clamp_cache_capacity, clamp_max_log_files, default_bucket_count,
    default_cache_capacity, default_log_filter, default_max_log_files,
};

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Writable root for new uploads; defaults to `<app root>/upload`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_root: Option<PathBuf>,
    /// Read-only fallback roots, checked in order after the upload root.
    #[serde(default)]
    pub seed_roots: Vec<PathBuf>,
    #[serde(default)]
    pub waveform: WaveformSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl PipelineConfig {
    pub(crate) fn normalized(self) -> Self {
        Self {
            waveform: self.waveform.normalized(),
            logging: self.logging.normalized(),
            ..self
        }
    }

    /// Configured upload root, or the default under the app directory.
    pub fn resolved_upload_root(&self) -> Result<PathBuf, ConfigError> {
        match &self.upload_root {
            Some(path) => Ok(path.clone()),
            None => Ok(app_dirs::default_upload_dir()?),
        }
    }
}

/// Waveform reduction and caching settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveformSettings {
    /// Number of peaks per summary.
    #[serde(default = "default_bucket_count")]
    pub bucket_count: usize,
    /// Bucket divisor arithmetic.
    #[serde(default)]
    pub bucket_mode: BucketMode,
    /// Summaries kept in memory; `0` disables the cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for WaveformSettings {
    fn default() -> Self {
        Self {
            bucket_count: default_bucket_count(),
            bucket_mode: BucketMode::default(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl WaveformSettings {
    fn normalized(self) -> Self {
        Self {
            bucket_count: clamp_bucket_count(self.bucket_count),
            cache_capacity: clamp_cache_capacity(self.cache_capacity),
            ..self
        }
    }

    /// Reduction options derived from these settings.
    pub fn reduce_options(&self) -> ReduceOptions {
        ReduceOptions {
            bucket_count: self.bucket_count,
            mode: self.bucket_mode,
        }
    }
}

/// Log output settings consumed by [`crate::logging::init`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing` filter directives used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Number of `soundpeaks_*.log` files kept in the log directory.
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            max_files: default_max_log_files(),
        }
    }
}

impl LoggingSettings {
    fn normalized(self) -> Self {
        let filter = if self.filter.trim().is_empty() {
            default_log_filter()
        } else {
            self.filter
        };
        Self {
            filter,
            max_files: clamp_max_log_files(self.max_files),
        }
    }
}
