use std::path::{Path, PathBuf};

use crate::app_dirs;
use crate::fs_ops::{WriteMode, atomic_write};

use super::{ConfigError, PipelineConfig};

/// File name of the settings file inside the app root.
pub const CONFIG_FILE_NAME: &str = "soundpeaks.toml";

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from the app root, returning defaults if missing.
pub fn load_or_default() -> Result<PipelineConfig, ConfigError> {
    load_from(&config_path()?)
}

/// Load configuration from `path`, returning defaults if the file is absent.
pub fn load_from(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No config file; using defaults");
            return Ok(PipelineConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str::<PipelineConfig>(&text)
        .map(PipelineConfig::normalized)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Save configuration to `path` atomically, creating parent directories as needed.
pub fn save_to_path(config: &PipelineConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(config)?;
    atomic_write(path, data.as_bytes(), WriteMode::Replace).map_err(|err| ConfigError::Write {
        path: err.path,
        source: err.source,
    })
}
