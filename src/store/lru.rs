use linked_hash_map::LinkedHashMap;

use super::byteview::ByteSized;

/// Callback invoked with the key and value of every entry the store evicts.
pub type EvictionHook<V> = Box<dyn FnMut(String, V) + Send>;

/// A size-constrained LRU store. Not safe for concurrent use; all shared
/// access goes through [`SyncCache`](super::SyncCache).
///
/// The store charges each entry `key length + value length` bytes against
/// `max_bytes`. Once the budget is exceeded, least recently used entries are
/// dropped until the total fits again. A `max_bytes` of zero disables the
/// bound entirely.
///
/// # Examples
/// ```
/// # use fleetcache::store::LruStore;
/// let mut lru: LruStore<String> = LruStore::new(10, None);
///
/// lru.add("a".to_owned(), "12".to_owned());
/// lru.add("b".to_owned(), "3456".to_owned());
/// assert_eq!(lru.get("a"), Some(&"12".to_owned()));
///
/// // "a" was just touched, so growing past 10 bytes evicts "b" first.
/// lru.add("c".to_owned(), "789".to_owned());
/// assert_eq!(lru.get("b"), None);
/// assert_eq!(lru.len(), 2);
/// ```
pub struct LruStore<V: ByteSized> {
    max_bytes: usize,
    nbytes: usize,
    // Recency order lives in the map itself: back = most recently used,
    // front = eviction candidate.
    map: LinkedHashMap<String, V>,
    on_evicted: Option<EvictionHook<V>>,
}

impl<V: ByteSized> LruStore<V> {
    /// Creates a store bounded to `max_bytes` (0 = unbounded), with an
    /// optional hook observing every eviction.
    pub fn new(max_bytes: usize, on_evicted: Option<EvictionHook<V>>) -> Self {
        Self {
            max_bytes,
            nbytes: 0,
            map: LinkedHashMap::new(),
            on_evicted,
        }
    }

    /// Looks up a value and promotes it to most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        self.map.get_refresh(key).map(|value| &*value)
    }

    /// Inserts or replaces a value, then evicts until the byte budget holds.
    ///
    /// Replacing a value adjusts the accounting by the value delta only; the
    /// key's length was charged on first insert and does not change. An entry
    /// larger than the whole budget is admitted and immediately evicted
    /// again.
    pub fn add(&mut self, key: String, value: V) {
        let key_len = key.len();
        let added = value.byte_len();

        match self.map.insert(key, value) {
            Some(stale) => {
                self.nbytes = self.nbytes - stale.byte_len() + added;
            }
            None => {
                self.nbytes += key_len + added;
            }
        }

        while self.max_bytes != 0 && self.nbytes > self.max_bytes {
            self.evict();
        }
    }

    /// Removes the least recently used entry and fires the eviction hook.
    pub fn evict(&mut self) {
        if let Some((key, value)) = self.map.pop_front() {
            self.nbytes -= key.len() + value.byte_len();
            if let Some(hook) = self.on_evicted.as_mut() {
                hook(key, value);
            }
        }
    }

    /// Returns the number of entries currently stored.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the bytes currently charged against the budget.
    pub fn nbytes(&self) -> usize {
        self.nbytes
    }
}
