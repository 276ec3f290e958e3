use serde::{Deserialize, Serialize};

/// Divisor arithmetic applied when a bucket closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketMode {
    /// Each bucket is divided by the number of samples it actually holds.
    #[default]
    Even,
    /// Bucket boundaries are tracked at the closing sample's 0-based index, so
    /// every bucket after the first divides by one more sample than it holds.
    /// Matches waveforms produced by the earlier service bit for bit.
    Legacy,
}

/// Number of buckets [`bucket_means`] produces for `total` samples.
pub fn expected_bucket_count(total: usize, bucket_count: usize) -> usize {
    if total == 0 || bucket_count == 0 {
        return 0;
    }
    total.div_ceil(total.div_ceil(bucket_count))
}

/// Average `mixed` into buckets of `ceil(len / bucket_count)` samples.
///
/// The final bucket may be short. Returns an empty vector for empty input or a
/// zero bucket count.
pub fn bucket_means(mixed: &[f64], bucket_count: usize, mode: BucketMode) -> Vec<f64> {
    let total = mixed.len();
    if total == 0 || bucket_count == 0 {
        return Vec::new();
    }
    let bucket_size = total.div_ceil(bucket_count);
    let mut peaks = Vec::with_capacity(expected_bucket_count(total, bucket_count));
    let mut acc = 0.0_f64;
    let mut boundary = 0usize;
    for (index, value) in mixed.iter().enumerate() {
        acc += value;
        let position = index + 1;
        if position % bucket_size == 0 || position == total {
            peaks.push(acc / (position - boundary) as f64);
            boundary = match mode {
                BucketMode::Even => position,
                BucketMode::Legacy => index,
            };
            acc = 0.0;
        }
    }
    peaks
}
