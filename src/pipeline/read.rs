use std::fs::File;
use std::sync::Arc;

use super::SoundService;
use crate::storage::{AssetId, ResolvedAsset, StorageError};
use crate::waveform::{WaveformError, WaveformSummary, reduce_with};

impl SoundService {
    /// Peak summary of the stored asset `id`.
    ///
    /// Malformed ids are indistinguishable from unknown ones and report
    /// [`WaveformError::NotFound`].
    pub fn waveform(&self, id: &str) -> Result<Arc<WaveformSummary>, WaveformError> {
        let id = AssetId::parse(id)?;
        self.cache.get_or_try_insert_with::<WaveformError>(&id, || {
            let bytes = self.store.read(&id)?;
            let pcm = self.decoder.decode(&bytes)?;
            let summary = reduce_with(&pcm, &self.reduce)?;
            tracing::debug!(%id, peaks = summary.peaks.len(), max = summary.max, "Reduced waveform");
            Ok(summary)
        })
    }

    /// Open the stored asset `id` for streaming to a client.
    ///
    /// The resolved location carries the content type to serve it with.
    pub fn open_asset(&self, id: &str) -> Result<(ResolvedAsset, File), StorageError> {
        let id = AssetId::parse(id)?;
        self.store.open(&id)
    }
}
