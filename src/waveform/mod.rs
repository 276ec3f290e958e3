//! Reduction of decoded PCM into a fixed-width peak summary for UI rendering.
//!
//! Channels are down-mixed to a mean of absolute values, split into
//! `ceil(len / bucket_count)`-sized buckets and each bucket is averaged. The
//! summary carries its own maximum so clients can normalize without a second pass.

mod buckets;
mod cache;
mod error;
mod mix;

use serde::{Deserialize, Serialize};

use crate::audio::PcmBuffer;

pub use buckets::{BucketMode, bucket_means, expected_bucket_count};
pub use cache::WaveformCache;
pub use error::WaveformError;
pub use mix::downmix;

/// Number of peaks produced when no other width is configured.
pub const DEFAULT_BUCKET_COUNT: usize = 100;

/// Peak summary of an audio asset, exchanged as `{"max": .., "peaks": [..]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformSummary {
    /// Largest value in `peaks`.
    pub max: f64,
    /// Mean absolute amplitude per bucket, in playback order.
    pub peaks: Vec<f64>,
}

impl WaveformSummary {
    /// Peaks scaled by `max` into `[0, 1]`; all zeros for silent audio.
    pub fn normalized(&self) -> Vec<f64> {
        if self.max <= 0.0 {
            return vec![0.0; self.peaks.len()];
        }
        self.peaks.iter().map(|peak| peak / self.max).collect()
    }
}

/// Parameters controlling how PCM is bucketed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceOptions {
    /// Target number of buckets.
    pub bucket_count: usize,
    /// Divisor arithmetic used when closing a bucket.
    pub mode: BucketMode,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            mode: BucketMode::Even,
        }
    }
}

/// Reduce `pcm` into `bucket_count` peaks using [`BucketMode::Even`].
pub fn reduce(pcm: &PcmBuffer, bucket_count: usize) -> Result<WaveformSummary, WaveformError> {
    reduce_with(
        pcm,
        &ReduceOptions {
            bucket_count,
            ..ReduceOptions::default()
        },
    )
}

/// Reduce `pcm` with explicit options.
///
/// Fails with [`WaveformError::EmptyInput`] when no bucket can be formed;
/// silence is still a valid summary of zeros.
pub fn reduce_with(
    pcm: &PcmBuffer,
    options: &ReduceOptions,
) -> Result<WaveformSummary, WaveformError> {
    if options.bucket_count == 0 {
        return Err(WaveformError::InvalidBucketCount);
    }
    let mixed = downmix(&pcm.channels);
    let peaks = bucket_means(&mixed, options.bucket_count, options.mode);
    let max = peaks
        .iter()
        .copied()
        .reduce(f64::max)
        .ok_or(WaveformError::EmptyInput)?;
    Ok(WaveformSummary { max, peaks })
}
