use crate::waveform::DEFAULT_BUCKET_COUNT;

pub(super) const MAX_BUCKET_COUNT: usize = 10_000;
pub(super) const MAX_CACHE_CAPACITY: usize = 65_536;
pub(super) const MAX_LOG_FILES: usize = 100;

pub(super) fn default_bucket_count() -> usize {
    DEFAULT_BUCKET_COUNT
}

pub(super) fn default_cache_capacity() -> usize {
    256
}

pub(super) fn clamp_bucket_count(value: usize) -> usize {
    value.clamp(1, MAX_BUCKET_COUNT)
}

pub(super) fn clamp_cache_capacity(value: usize) -> usize {
    value.min(MAX_CACHE_CAPACITY)
}

pub(super) fn default_log_filter() -> String {
    "info".to_string()
}

pub(super) fn default_max_log_files() -> usize {
    10
}

pub(super) fn clamp_max_log_files(value: usize) -> usize {
    value.clamp(1, MAX_LOG_FILES)
}
