//! Orchestration Layer
//!
//! A [`Group`] is a named cache namespace: it owns a synchronized local
//! cache and a single-flight coalescer, and optionally shares a peer picker
//! with the other groups of the process.
//!
//! ## Lookup contract
//! `get(key)` answers from the local cache when it can. On a miss the whole
//! load path runs under single flight, so a thundering herd for one key
//! costs one backing fetch: the key's home peer is asked first (when a
//! picker is bound and the key hashes to a remote node), and the
//! application-supplied [`Loader`] produces the bytes when the peer fails or
//! the key belongs to the local node. Loader results populate the local
//! cache; peer-served results do not, since the home node already caches them.

pub mod registry;


pub use registry::{get_group, list_groups, new_group};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::flight::FlightGroup;
use crate::peers::PeerPicker;
use crate::store::{ByteView, CacheSnapshot, SyncCache};

/// Loads authoritative bytes for a key. Invoked on a local cache miss that
/// no peer can answer.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self, key: &str) -> Result<Vec<u8>>;
}

/// Adapts a plain function into a [`Loader`].
///
/// # Examples
/// ```
/// # use fleetcache::group::LoaderFn;
/// let loader = LoaderFn::new(|key: &str| Ok(key.as_bytes().to_vec()));
/// ```
pub struct LoaderFn<F>(F);

impl<F> LoaderFn<F>
where
    F: Fn(&str) -> Result<Vec<u8>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Loader for LoaderFn<F>
where
    F: Fn(&str) -> Result<Vec<u8>> + Send + Sync,
{
    async fn load(&self, key: &str) -> Result<Vec<u8>> {
        (self.0)(key)
    }
}

/// Counters and cache state of one group, served by the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GroupStats {
    pub name: String,
    pub gets: u64,
    pub cache_hits: u64,
    pub peer_loads: u64,
    pub local_loads: u64,
    pub cache: CacheSnapshot,
}

/// A named cache namespace. Created once via [`new_group`] and retained in
/// the process-wide registry for the life of the process.
pub struct Group {
    name: String,
    loader: Arc<dyn Loader>,
    main_cache: SyncCache,
    flight: FlightGroup<ByteView>,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    gets: AtomicU64,
    cache_hits: AtomicU64,
    peer_loads: AtomicU64,
    local_loads: AtomicU64,
}

impl Group {
    pub(crate) fn new(name: &str, cache_bytes: usize, loader: Arc<dyn Loader>) -> Self {
        Self {
            name: name.to_string(),
            loader,
            main_cache: SyncCache::new(cache_bytes),
            flight: FlightGroup::new(),
            peers: OnceLock::new(),
            gets: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            peer_loads: AtomicU64::new(0),
            local_loads: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binds the peer picker. One-shot; the binding lasts for the life of
    /// the group.
    ///
    /// # Panics
    /// Panics if a picker is already registered for this group.
    pub fn register_peers(&self, picker: Arc<dyn PeerPicker>) {
        if self.peers.set(picker).is_err() {
            panic!("peers already registered for group {:?}", self.name);
        }
    }

    /// Looks up `key`, loading it on a miss.
    ///
    /// An empty key is a request error. A peer-served value is returned
    /// without populating the local cache.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(anyhow::anyhow!("key is required"));
        }
        self.gets.fetch_add(1, Ordering::Relaxed);

        if let Some(view) = self.main_cache.get(key) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("cache hit for {}/{}", self.name, key);
            return Ok(view);
        }

        self.load(key).await
    }

    /// Cache-miss path. Coalesced per key: concurrent misses trigger exactly
    /// one peer fetch or loader call, and every waiter shares its outcome.
    async fn load(&self, key: &str) -> Result<ByteView> {
        self.flight
            .call_once(key, || async {
                if let Some(picker) = self.peers.get()
                    && let Some(peer) = picker.pick_peer(key)
                {
                    match peer.fetch(&self.name, key).await {
                        Ok(bytes) => {
                            self.peer_loads.fetch_add(1, Ordering::Relaxed);
                            // The home node caches this value; here it only
                            // passes through.
                            return Ok(ByteView::new(bytes));
                        }
                        Err(e) => {
                            tracing::warn!(
                                "peer fetch for {}/{} failed, loading locally: {}",
                                self.name,
                                key,
                                e
                            );
                        }
                    }
                }

                self.load_locally(key).await
            })
            .await
    }

    async fn load_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = self.loader.load(key).await?;
        self.local_loads.fetch_add(1, Ordering::Relaxed);

        let view = ByteView::new(bytes);
        self.main_cache.add(key, view.clone());
        Ok(view)
    }

    pub fn stats(&self) -> GroupStats {
        GroupStats {
            name: self.name.clone(),
            gets: self.gets.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            peer_loads: self.peer_loads.load(Ordering::Relaxed),
            local_loads: self.local_loads.load(Ordering::Relaxed),
            cache: self.main_cache.snapshot(),
        }
    }
}
