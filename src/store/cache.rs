use std::sync::Mutex;

use serde::Serialize;

use super::byteview::ByteView;
use super::lru::LruStore;

/// Point-in-time view of a cache, served by the node stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CacheSnapshot {
    /// Number of entries currently held.
    pub entries: usize,
    /// Bytes charged against the budget (keys + values).
    pub used_bytes: usize,
    /// Configured byte budget; 0 means unbounded.
    pub cache_bytes: usize,
}

/// Mutex shell around [`LruStore`], the only path through which the store is
/// shared between tasks.
///
/// The inner store is built lazily on the first `add`: a group whose keys all
/// miss (and are served by peers) never allocates a local store at all.
pub struct SyncCache {
    inner: Mutex<Option<LruStore<ByteView>>>,
    cache_bytes: usize,
}

impl SyncCache {
    pub fn new(cache_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(None),
            cache_bytes,
        }
    }

    pub fn add(&self, key: &str, value: ByteView) {
        let mut guard = self.inner.lock().expect("cache mutex poisoned");
        guard
            .get_or_insert_with(|| LruStore::new(self.cache_bytes, None))
            .add(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut guard = self.inner.lock().expect("cache mutex poisoned");
        guard.as_mut()?.get(key).cloned()
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        let guard = self.inner.lock().expect("cache mutex poisoned");
        let (entries, used_bytes) = guard
            .as_ref()
            .map(|lru| (lru.len(), lru.nbytes()))
            .unwrap_or((0, 0));

        CacheSnapshot {
            entries,
            used_bytes,
            cache_bytes: self.cache_bytes,
        }
    }
}
