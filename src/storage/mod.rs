//! Stored sound assets spread across prioritized filesystem roots.
//!
//! The first root receives uploads; later roots hold read-only seed assets.
//! Each asset lives at `<root>/sounds/<id>.<ext>`.

mod asset_id;
mod error;

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::fs_ops::{WriteMode, atomic_write};
use crate::transcode::CANONICAL_FORMAT;

pub use asset_id::AssetId;
pub use error::StorageError;

/// Subdirectory of every root that holds sound assets.
pub const SOUNDS_DIR: &str = "sounds";

/// Role of a storage root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    /// Writable root receiving new uploads.
    Upload,
    /// Read-only fallback with pre-bundled assets.
    Seed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StorageRoot {
    kind: RootKind,
    dir: PathBuf,
}

/// Location of a found asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub id: AssetId,
    pub kind: RootKind,
    pub path: PathBuf,
    /// Content type to serve the stored bytes with.
    pub mime_type: &'static str,
}

/// Filesystem asset store that checks its roots in a fixed priority order.
#[derive(Debug, Clone)]
pub struct SoundStore {
    roots: Vec<StorageRoot>,
    extension: &'static str,
    mime_type: &'static str,
}

impl SoundStore {
    /// Create a store with a writable upload root and ordered seed fallbacks.
    pub fn new(upload_root: PathBuf, seed_roots: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut roots = vec![StorageRoot {
            kind: RootKind::Upload,
            dir: upload_root,
        }];
        roots.extend(seed_roots.into_iter().map(|dir| StorageRoot {
            kind: RootKind::Seed,
            dir,
        }));
        Self {
            roots,
            extension: CANONICAL_FORMAT.extension,
            mime_type: CANONICAL_FORMAT.mime_type,
        }
    }

    fn asset_path(&self, root: &StorageRoot, id: &AssetId) -> PathBuf {
        root.dir
            .join(SOUNDS_DIR)
            .join(format!("{id}.{}", self.extension))
    }

    /// Find the first root holding `id`.
    ///
    /// A root that cannot be inspected stops the search with `Io`, since it may
    /// hold the asset and later roots must not shadow it.
    pub fn resolve(&self, id: &AssetId) -> Result<ResolvedAsset, StorageError> {
        for root in &self.roots {
            let path = self.asset_path(root, id);
            match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() => {
                    tracing::debug!(%id, path = %path.display(), "Resolved sound asset");
                    return Ok(ResolvedAsset {
                        id: id.clone(),
                        kind: root.kind,
                        path,
                        mime_type: self.mime_type,
                    });
                }
                Ok(_) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(source) => {
                    tracing::warn!(path = %path.display(), "Unable to inspect sound asset: {source}");
                    return Err(StorageError::Io { path, source });
                }
            }
        }
        Err(StorageError::NotFound { id: id.to_string() })
    }

    /// True when any root holds `id`.
    pub fn exists(&self, id: &AssetId) -> bool {
        self.resolve(id).is_ok()
    }

    /// Read the stored bytes for `id`.
    pub fn read(&self, id: &AssetId) -> Result<Vec<u8>, StorageError> {
        let resolved = self.resolve(id)?;
        std::fs::read(&resolved.path).map_err(|source| read_error(id, &resolved.path, source))
    }

    /// Open the stored asset for streaming.
    pub fn open(&self, id: &AssetId) -> Result<(ResolvedAsset, File), StorageError> {
        let resolved = self.resolve(id)?;
        let file =
            File::open(&resolved.path).map_err(|source| read_error(id, &resolved.path, source))?;
        Ok((resolved, file))
    }

    /// Persist `bytes` as a new asset in the upload root.
    ///
    /// The write is atomic and refuses to replace an existing asset.
    pub fn write(&self, id: &AssetId, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let root = self.upload_root();
        let path = self.asset_path(root, id);
        let dir = root.dir.join(SOUNDS_DIR);
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        atomic_write(&path, bytes, WriteMode::CreateNew).map_err(|err| {
            if err.is_already_exists() {
                StorageError::AlreadyExists { path: path.clone() }
            } else {
                StorageError::Io {
                    path: err.path,
                    source: err.source,
                }
            }
        })?;
        tracing::info!(%id, path = %path.display(), bytes = bytes.len(), "Stored sound asset");
        Ok(path)
    }

    fn upload_root(&self) -> &StorageRoot {
        // `new` always places the upload root first.
        &self.roots[0]
    }
}

/// A file that vanished between lookup and read is still "not found".
fn read_error(id: &AssetId, path: &Path, source: std::io::Error) -> StorageError {
    if source.kind() == ErrorKind::NotFound {
        StorageError::NotFound { id: id.to_string() }
    } else {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
