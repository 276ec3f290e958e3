//! Orchestration of uploads and waveform reads over injected collaborators.
//!
//! A [`SoundService`] is shared across request workers; it owns no per-request
//! state apart from the waveform cache.

mod error;
mod ingest;
mod read;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::audio::{AudioDecoder, SampleDecoder};
use crate::config::{ConfigError, PipelineConfig, WaveformSettings};
use crate::storage::{AssetId, SoundStore};
use crate::tags::{SymphoniaTagReader, TagReader};
use crate::transcode::{Transcoder, WavTranscoder};
use crate::waveform::{ReduceOptions, WaveformCache};

pub use error::IngestError;

/// Result of a successful upload, exchanged as `{"id", "artist", "title"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReceipt {
    pub id: AssetId,
    pub artist: Option<String>,
    pub title: Option<String>,
}

/// Entry point for ingesting uploads and serving waveform summaries.
pub struct SoundService {
    store: SoundStore,
    decoder: Arc<dyn SampleDecoder>,
    transcoder: Arc<dyn Transcoder>,
    tag_reader: Arc<dyn TagReader>,
    reduce: ReduceOptions,
    cache: WaveformCache,
}

impl SoundService {
    /// Service over `store` using the built-in codec stack and default settings.
    pub fn new(store: SoundStore) -> Self {
        let decoder: Arc<dyn SampleDecoder> = Arc::new(AudioDecoder::new());
        let settings = WaveformSettings::default();
        Self {
            store,
            transcoder: Arc::new(WavTranscoder::new(Arc::clone(&decoder))),
            decoder,
            tag_reader: Arc::new(SymphoniaTagReader),
            reduce: settings.reduce_options(),
            cache: WaveformCache::new(settings.cache_capacity),
        }
    }

    /// Service whose roots and waveform settings come from `config`.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        let store = SoundStore::new(
            config.resolved_upload_root()?,
            config.seed_roots.iter().cloned(),
        );
        Ok(Self::new(store).with_waveform_settings(config.waveform))
    }

    /// Replace the decoder used for waveform reads.
    pub fn with_decoder(mut self, decoder: Arc<dyn SampleDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Replace the transcoder used during ingest.
    pub fn with_transcoder(mut self, transcoder: Arc<dyn Transcoder>) -> Self {
        self.transcoder = transcoder;
        self
    }

    /// Replace the tag reader used during ingest.
    pub fn with_tag_reader(mut self, tag_reader: Arc<dyn TagReader>) -> Self {
        self.tag_reader = tag_reader;
        self
    }

    /// Apply bucket and cache settings; resets the cache.
    pub fn with_waveform_settings(mut self, settings: WaveformSettings) -> Self {
        self.reduce = settings.reduce_options();
        self.cache = WaveformCache::new(settings.cache_capacity);
        self
    }

    /// The underlying asset store.
    pub fn store(&self) -> &SoundStore {
        &self.store
    }

    /// Number of waveform summaries currently cached.
    pub fn cached_waveforms(&self) -> usize {
        self.cache.len()
    }
}
