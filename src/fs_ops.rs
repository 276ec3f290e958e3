//! Atomic file writes: data lands in a uniquely named sibling temp file, is
//! synced, then moved into place so readers never observe a partial file.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rand::TryRngCore;
use thiserror::Error;

const TEMP_NAME_ATTEMPTS: usize = 5;

/// How the final path is claimed once the temp file is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Overwrite whatever is already at the destination.
    Replace,
    /// Fail with [`io::ErrorKind::AlreadyExists`] if the destination exists.
    CreateNew,
}

/// Failure during an atomic write, tagged with the path being touched.
#[derive(Debug, Error)]
#[error("Failed to write {path}: {source}")]
pub struct AtomicWriteError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl AtomicWriteError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True when a [`WriteMode::CreateNew`] write found an existing destination.
    pub fn is_already_exists(&self) -> bool {
        self.source.kind() == io::ErrorKind::AlreadyExists
    }
}

/// Write `data` to `path` atomically.
pub fn atomic_write(path: &Path, data: &[u8], mode: WriteMode) -> Result<(), AtomicWriteError> {
    let dir = path.parent().ok_or_else(|| {
        AtomicWriteError::new(path, io::Error::other("path has no parent directory"))
    })?;
    let file_name = path
        .file_name()
        .ok_or_else(|| AtomicWriteError::new(path, io::Error::other("path has no file name")))?;

    let mut last_err = None;
    for _ in 0..TEMP_NAME_ATTEMPTS {
        let tmp_path = dir.join(format!(
            "{}.tmp-{}",
            file_name.to_string_lossy(),
            random_suffix().map_err(|source| AtomicWriteError::new(path, source))?
        ));
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path);
        let mut file = match file {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                last_err = Some(err);
                continue;
            }
            Err(err) => return Err(AtomicWriteError::new(&tmp_path, err)),
        };

        let written = file.write_all(data).and_then(|()| file.sync_all());
        drop(file);
        if let Err(err) = written {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(AtomicWriteError::new(&tmp_path, err));
        }
        if let Err(err) = claim_destination(&tmp_path, path, mode) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(AtomicWriteError::new(path, err));
        }
        sync_parent_dir(dir)?;
        return Ok(());
    }

    Err(AtomicWriteError::new(
        path,
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "failed to create temporary file: {}",
                last_err
                    .as_ref()
                    .map(|err| err.to_string())
                    .unwrap_or_else(|| "unknown error".into())
            ),
        ),
    ))
}

fn random_suffix() -> io::Result<String> {
    let mut bytes = [0u8; 6];
    rand::rngs::OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|err| io::Error::other(format!("failed to generate temp suffix: {err}")))?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

fn claim_destination(tmp_path: &Path, path: &Path, mode: WriteMode) -> io::Result<()> {
    match mode {
        WriteMode::Replace => replace_file(tmp_path, path),
        WriteMode::CreateNew => match std::fs::hard_link(tmp_path, path) {
            Ok(()) => {
                let _ = std::fs::remove_file(tmp_path);
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Err(err),
            // Filesystems without hard links fall back to check-then-rename.
            Err(_) if path.exists() => Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "destination already exists",
            )),
            Err(_) => replace_file(tmp_path, path),
        },
    }
}

fn replace_file(temp_path: &Path, path: &Path) -> io::Result<()> {
    match std::fs::rename(temp_path, path) {
        Ok(()) => Ok(()),
        Err(err) => {
            #[cfg(target_os = "windows")]
            if err.kind() == io::ErrorKind::AlreadyExists
                || err.kind() == io::ErrorKind::PermissionDenied
            {
                if let Err(inner) = std::fs::remove_file(path) {
                    if inner.kind() != io::ErrorKind::NotFound {
                        return Err(inner);
                    }
                }
                std::fs::rename(temp_path, path)?;
                return Ok(());
            }
            Err(err)
        }
    }
}

fn sync_parent_dir(dir: &Path) -> Result<(), AtomicWriteError> {
    #[cfg(unix)]
    {
        std::fs::File::open(dir)
            .and_then(|handle| handle.sync_all())
            .map_err(|source| AtomicWriteError::new(dir, source))?;
    }
    #[cfg(not(unix))]
    {
        let _ = dir;
    }
    Ok(())
}
