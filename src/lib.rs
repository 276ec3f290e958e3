//! Audio ingest pipeline: canonical transcoding, tag extraction and waveform peak summaries.
/// Application directory resolution.
pub mod app_dirs;
/// PCM decoding of uploaded and stored audio.
pub mod audio;
/// Pipeline configuration loaded from TOML.
pub mod config;
/// Atomic file writes shared by config and storage.
pub mod fs_ops;
/// Global tracing subscriber setup.
pub mod logging;
/// Ingest and waveform read orchestration.
pub mod pipeline;
/// Asset storage across prioritized roots.
pub mod storage;
/// Tag metadata extraction.
pub mod tags;
/// Conversion into the canonical distribution format.
pub mod transcode;
/// Waveform peak reduction and caching.
pub mod waveform;

pub use pipeline::{IngestError, IngestReceipt, SoundService};
pub use storage::{AssetId, SoundStore, StorageError};
pub use waveform::{WaveformError, WaveformSummary};
