#[cfg(test)]
mod tests {
    use crate::store::{ByteView, LruStore, SyncCache};
    use std::sync::{Arc, Mutex};

    fn view(text: &str) -> ByteView {
        ByteView::from(text)
    }

    // ============================================================
    // BYTE VIEW TESTS
    // ============================================================

    #[test]
    fn test_byteview_len_and_copy() {
        let bv = ByteView::new(vec![1, 2, 3]);
        assert_eq!(bv.len(), 3);

        // Extraction copies; mutating the copy leaves the view untouched.
        let mut extracted = bv.to_vec();
        extracted[0] = 99;
        assert_eq!(bv.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_byteview_clone_is_shallow_but_equal() {
        let bv = ByteView::from("hello");
        let copy = bv.clone();
        assert_eq!(bv, copy);
        assert_eq!(copy.to_string(), "hello");
    }

    // ============================================================
    // LRU STORE TESTS
    // ============================================================

    #[test]
    fn test_lru_get_hit_and_miss() {
        let mut lru: LruStore<ByteView> = LruStore::new(0, None);
        lru.add("key1".to_string(), view("1234"));

        assert_eq!(lru.get("key1"), Some(&view("1234")));
        assert_eq!(lru.get("key2"), None);
    }

    #[test]
    fn test_lru_evicts_oldest_when_over_budget() {
        // a=3, b=5: budget 10 holds both; c=4 pushes the total to 12 and the
        // oldest entry ("a") has to go.
        let mut lru: LruStore<ByteView> = LruStore::new(10, None);
        lru.add("a".to_string(), view("12"));
        lru.add("b".to_string(), view("3456"));
        lru.add("c".to_string(), view("789"));

        assert_eq!(lru.get("a"), None);
        assert!(lru.get("b").is_some());
        assert!(lru.get("c").is_some());
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_lru_get_refreshes_recency() {
        let mut lru: LruStore<ByteView> = LruStore::new(10, None);
        lru.add("a".to_string(), view("12"));
        lru.add("b".to_string(), view("34"));

        // Touch "a" so "b" becomes the eviction candidate.
        assert!(lru.get("a").is_some());
        lru.add("c".to_string(), view("56789"));

        assert!(lru.get("a").is_some());
        assert_eq!(lru.get("b"), None);
        assert!(lru.get("c").is_some());
    }

    #[test]
    fn test_lru_byte_accounting() {
        let mut lru: LruStore<ByteView> = LruStore::new(0, None);
        lru.add("a".to_string(), view("1234"));
        lru.add("bb".to_string(), view("56"));
        assert_eq!(lru.nbytes(), 1 + 4 + 2 + 2);

        // Replacement charges the value delta only; the key stays charged.
        lru.add("a".to_string(), view("1"));
        assert_eq!(lru.nbytes(), 1 + 1 + 2 + 2);
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_lru_replace_refreshes_recency() {
        let mut lru: LruStore<ByteView> = LruStore::new(11, None);
        lru.add("a".to_string(), view("123"));
        lru.add("b".to_string(), view("123"));

        // Re-adding "a" makes "b" the oldest entry.
        lru.add("a".to_string(), view("456"));
        lru.add("c".to_string(), view("123"));

        assert_eq!(lru.get("b"), None);
        assert!(lru.get("a").is_some());
        assert!(lru.get("c").is_some());
    }

    #[test]
    fn test_lru_zero_budget_never_evicts() {
        let mut lru: LruStore<ByteView> = LruStore::new(0, None);
        for i in 0..1000 {
            lru.add(format!("key-{}", i), view("some value"));
        }
        assert_eq!(lru.len(), 1000);
    }

    #[test]
    fn test_lru_entry_larger_than_budget_is_purged() {
        let mut lru: LruStore<ByteView> = LruStore::new(4, None);
        lru.add("huge".to_string(), view("0123456789"));

        assert_eq!(lru.len(), 0);
        assert_eq!(lru.nbytes(), 0);
        assert_eq!(lru.get("huge"), None);
    }

    #[test]
    fn test_lru_eviction_hook_fires_once_per_entry() {
        let evicted: Arc<Mutex<Vec<(String, ByteView)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = evicted.clone();

        let mut lru: LruStore<ByteView> = LruStore::new(
            10,
            Some(Box::new(move |key, value| {
                sink.lock().unwrap().push((key, value));
            })),
        );

        lru.add("k1".to_string(), view("1234"));
        lru.add("k2".to_string(), view("1234"));
        lru.add("k3".to_string(), view("1234"));
        lru.add("k4".to_string(), view("1234"));

        let evicted = evicted.lock().unwrap();
        let keys: Vec<&str> = evicted.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["k1", "k2", "k3"]);
        assert_eq!(evicted[0].1, view("1234"));
    }

    #[test]
    fn test_lru_invariant_after_mixed_operations() {
        let mut lru: LruStore<ByteView> = LruStore::new(64, None);
        for i in 0..100 {
            lru.add(format!("k{}", i % 7), view(&"x".repeat(i % 13)));
            let _ = lru.get(&format!("k{}", i % 5));
            assert!(lru.nbytes() <= 64, "budget exceeded: {}", lru.nbytes());
        }
    }

    // ============================================================
    // SYNC CACHE TESTS
    // ============================================================

    #[test]
    fn test_sync_cache_miss_before_first_add() {
        let cache = SyncCache::new(1024);
        assert_eq!(cache.get("anything"), None);
        assert_eq!(cache.snapshot().entries, 0);
    }

    #[test]
    fn test_sync_cache_add_then_get() {
        let cache = SyncCache::new(1024);
        cache.add("key1", view("value"));

        assert_eq!(cache.get("key1"), Some(view("value")));
        let snapshot = cache.snapshot();
        assert_eq!(snapshot.entries, 1);
        assert_eq!(snapshot.used_bytes, 4 + 5);
        assert_eq!(snapshot.cache_bytes, 1024);
    }

    #[test]
    fn test_sync_cache_shared_across_threads() {
        let cache = Arc::new(SyncCache::new(0));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        cache.add(&format!("t{}-{}", t, i), ByteView::from("v"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.snapshot().entries, 800);
    }
}
