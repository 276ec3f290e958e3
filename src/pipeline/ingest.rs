use std::panic;
use std::thread;

use super::{IngestError, IngestReceipt, SoundService};
use crate::storage::AssetId;
use crate::transcode::CANONICAL_FORMAT;

impl SoundService {
    /// Store an upload in the canonical format and report its tags.
    ///
    /// Tag reading and transcoding run concurrently; the asset is written only
    /// once both succeed, so a failed ingest leaves nothing behind.
    pub fn ingest(&self, raw: &[u8]) -> Result<IngestReceipt, IngestError> {
        if raw.is_empty() {
            return Err(IngestError::EmptyUpload);
        }
        let id = AssetId::new();
        tracing::info!(%id, bytes = raw.len(), "Ingesting sound");

        let (tags, transcoded) = thread::scope(|scope| {
            let tags = scope.spawn(|| self.tag_reader.read_tags(raw));
            let transcoded = self.transcoder.transcode(raw, &CANONICAL_FORMAT);
            let tags = tags
                .join()
                .unwrap_or_else(|payload| panic::resume_unwind(payload));
            (tags, transcoded)
        });
        let tags = tags.inspect_err(|err| tracing::warn!(%id, "Tag extraction failed: {err}"))?;
        let transcoded =
            transcoded.inspect_err(|err| tracing::warn!(%id, "Transcode failed: {err}"))?;

        self.store.write(&id, &transcoded)?;
        Ok(IngestReceipt {
            id,
            artist: tags.artist,
            title: tags.title,
        })
    }
}
