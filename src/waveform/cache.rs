use super::WaveformSummary;
use crate::storage::AssetId;
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

/// Bounded least-recently-used cache of summaries keyed by asset id.
///
/// Stored assets never change, so a cached summary never goes stale. The lock
/// is never held while a summary is computed.
pub struct WaveformCache {
    inner: Mutex<CacheInner>,
}

impl WaveformCache {
    /// Create a cache holding at most `max_entries` summaries; `0` disables it.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::new(max_entries)),
        }
    }

    /// Return the cached summary for `id`, if any.
    pub fn get(&self, id: &AssetId) -> Option<Arc<WaveformSummary>> {
        let mut inner = self.lock();
        let hit = inner.map.get(id).cloned()?;
        inner.touch(id);
        Some(hit)
    }

    /// Return the cached summary or compute, store and return a new one.
    ///
    /// Concurrent misses for the same id may each compute; the first stored
    /// value wins so every caller observes the same summary afterwards.
    pub fn get_or_try_insert_with<E>(
        &self,
        id: &AssetId,
        compute: impl FnOnce() -> Result<WaveformSummary, E>,
    ) -> Result<Arc<WaveformSummary>, E> {
        if let Some(hit) = self.get(id) {
            tracing::debug!(%id, "Waveform cache hit");
            return Ok(hit);
        }
        let computed = Arc::new(compute()?);
        let mut inner = self.lock();
        if inner.max_entries == 0 {
            return Ok(computed);
        }
        if let Some(hit) = inner.map.get(id).cloned() {
            inner.touch(id);
            return Ok(hit);
        }
        inner.insert(id.clone(), Arc::clone(&computed));
        Ok(computed)
    }

    /// Number of cached summaries.
    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(|err| err.into_inner())
    }
}

struct CacheInner {
    map: HashMap<AssetId, Arc<WaveformSummary>>,
    order: VecDeque<AssetId>,
    max_entries: usize,
}

impl CacheInner {
    fn new(max_entries: usize) -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
        }
    }

    fn touch(&mut self, key: &AssetId) {
        self.order.retain(|existing| existing != key);
        self.order.push_back(key.clone());
    }

    fn insert(&mut self, key: AssetId, value: Arc<WaveformSummary>) {
        self.touch(&key);
        self.map.insert(key, value);
        self.evict();
    }

    fn evict(&mut self) {
        while self.map.len() > self.max_entries {
            let Some(key) = self.order.pop_front() else {
                break;
            };
            self.map.remove(&key);
        }
    }
}
