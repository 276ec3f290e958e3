//! Tracing setup for hosts embedding the pipeline.
//!
//! [`init`] installs one global subscriber that writes to stdout and to a
//! per-launch `soundpeaks_<timestamp>.log` file. Pruning only ever removes files
//! carrying that prefix, so the log directory may be shared with other programs.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock},
    time::SystemTime,
};

use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, filter::ParseError, fmt, prelude::*};

use crate::app_dirs::{self, AppDirError};
use crate::config::LoggingSettings;

const LOG_FILE_PREFIX: &str = "soundpeaks_";
const LOG_FILE_EXTENSION: &str = "log";

struct ActiveLog {
    path: PathBuf,
    _guard: WorkerGuard,
}

static ACTIVE: OnceLock<ActiveLog> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Failures while installing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The default log directory could not be resolved.
    #[error(transparent)]
    LogDir(#[from] AppDirError),
    /// The log directory could not be created.
    #[error("Cannot create log directory {path}: {source}")]
    PrepareDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// This launch's log file could not be created.
    #[error("Cannot create log file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Old log files could not be listed or removed.
    #[error("Cannot prune old logs at {path}: {source}")]
    Prune {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The launch timestamp could not be formatted.
    #[error("Cannot format log file timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    /// The configured filter directives do not parse.
    #[error("Invalid log filter {filter:?}: {source}")]
    Filter { filter: String, source: ParseError },
    /// Some other global subscriber was installed first.
    #[error("A global tracing subscriber is already installed: {0}")]
    AlreadyInstalled(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install logging with files under `<app root>/logs`.
///
/// Returns the log file of this process; later calls return the same path.
pub fn init(settings: &LoggingSettings) -> Result<PathBuf, LoggingError> {
    if let Some(path) = active_log_file() {
        return Ok(path.to_path_buf());
    }
    init_in(&app_dirs::logs_dir()?, settings)
}

/// Install logging with files written to `log_dir`.
pub fn init_in(log_dir: &Path, settings: &LoggingSettings) -> Result<PathBuf, LoggingError> {
    let _lock = INIT_LOCK.lock().unwrap_or_else(|err| err.into_inner());
    if let Some(active) = ACTIVE.get() {
        return Ok(active.path.clone());
    }
    let filter = build_filter(&settings.filter)?;
    fs::create_dir_all(log_dir).map_err(|source| LoggingError::PrepareDir {
        path: log_dir.to_path_buf(),
        source,
    })?;
    let file_name = log_file_name(now_local_or_utc())?;
    let path = log_dir.join(&file_name);
    touch(&path)?;
    prune_old_logs(log_dir, settings.max_files)?;

    let (file_writer, guard) = tracing_appender::non_blocking(rolling::never(log_dir, &file_name));
    let timer = build_timer();
    let subscriber = Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_timer(timer.clone())
                .with_writer(std::io::stdout),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(file_writer),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = ACTIVE.set(ActiveLog {
        path: path.clone(),
        _guard: guard,
    });

    tracing::info!(path = %path.display(), "Logging initialized");
    Ok(path)
}

/// Log file chosen by the first successful [`init`] or [`init_in`] call.
pub fn active_log_file() -> Option<&'static Path> {
    ACTIVE.get().map(|active| active.path.as_path())
}

/// `RUST_LOG` wins over configured directives when it parses.
fn build_filter(directives: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => parse_filter(directives),
    }
}

fn parse_filter(directives: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directives).map_err(|source| LoggingError::Filter {
        filter: directives.to_string(),
        source,
    })
}

fn touch(path: &Path) -> Result<(), LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|source| LoggingError::CreateFile {
            path: path.to_path_buf(),
            source,
        })
}

fn is_own_log(path: &Path) -> bool {
    let has_prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX));
    has_prefix && path.extension().and_then(|ext| ext.to_str()) == Some(LOG_FILE_EXTENSION)
}

/// Remove the oldest `soundpeaks_*.log` files beyond `keep`.
fn prune_old_logs(dir: &Path, keep: usize) -> Result<(), LoggingError> {
    let listing = fs::read_dir(dir).map_err(|source| LoggingError::Prune {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut logs: Vec<(SystemTime, PathBuf)> = listing
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_file()))
        .map(|entry| entry.path())
        .filter(|path| is_own_log(path))
        .map(|path| {
            let modified = fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .collect();

    logs.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    let excess = logs.len().saturating_sub(keep);
    for (_, path) in logs.into_iter().take(excess) {
        fs::remove_file(&path).map_err(|source| LoggingError::Prune { path, source })?;
    }
    Ok(())
}

fn log_file_name(now: OffsetDateTime) -> Result<String, LoggingError> {
    const NAME_FORMAT: &[BorrowedFormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    let stamp = now.format(NAME_FORMAT)?;
    Ok(format!("{LOG_FILE_PREFIX}{stamp}.{LOG_FILE_EXTENSION}"))
}

fn build_timer() -> fmt::time::OffsetTime<BorrowedFormatItem<'static>> {
    const DISPLAY_FORMAT: &[BorrowedFormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
