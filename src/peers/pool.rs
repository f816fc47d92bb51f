use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use super::protocol::{DEFAULT_BASE_PATH, DEFAULT_REPLICAS, FETCH_ATTEMPTS, FETCH_TIMEOUT};
use super::{PeerFetcher, PeerPicker};
use crate::ring::HashRing;

/// Ring and client map, always replaced together.
struct PoolState {
    ring: HashRing,
    fetchers: HashMap<String, Arc<HttpFetcher>>,
}

/// HTTP-backed peer pool.
///
/// Holds the placement ring and one [`HttpFetcher`] per peer. The pool is
/// shared by every group that registers it; [`HttpPool::set_peers`] replaces
/// ring and clients atomically, so a picker never sees a peer the ring does
/// not know about.
pub struct HttpPool {
    self_url: String,
    base_path: String,
    state: Mutex<PoolState>,
}

impl HttpPool {
    /// Creates a pool for the node reachable at `self_url`, serving under
    /// [`DEFAULT_BASE_PATH`].
    pub fn new(self_url: &str) -> Self {
        Self::with_base_path(self_url, DEFAULT_BASE_PATH)
    }

    pub fn with_base_path(self_url: &str, base_path: &str) -> Self {
        let cleaned = base_path.trim_matches('/');
        let base_path = if cleaned.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", cleaned)
        };

        Self {
            self_url: self_url.trim_end_matches('/').to_string(),
            base_path,
            state: Mutex::new(PoolState {
                ring: HashRing::new(DEFAULT_REPLICAS),
                fetchers: HashMap::new(),
            }),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Replaces the pool's peer list. The previous ring and client map are
    /// discarded wholesale; in-flight fetches against old peers run to
    /// completion on their own clients.
    pub fn set_peers<S: AsRef<str>>(&self, peers: &[S]) {
        let peers: Vec<String> = peers
            .iter()
            .map(|peer| peer.as_ref().trim_end_matches('/').to_string())
            .collect();

        let mut ring = HashRing::new(DEFAULT_REPLICAS);
        ring.add(&peers);

        let fetchers = peers
            .iter()
            .map(|peer| {
                let fetcher = HttpFetcher::new(format!("{}{}", peer, self.base_path));
                (peer.clone(), Arc::new(fetcher))
            })
            .collect();

        let mut state = self.state.lock().expect("peer pool mutex poisoned");
        *state = PoolState { ring, fetchers };
        tracing::info!("peer set replaced: {} peer(s)", peers.len());
    }

    /// Returns the URL of the node that owns `key` according to the current
    /// ring, the local node included.
    pub fn owner(&self, key: &str) -> Option<String> {
        let state = self.state.lock().expect("peer pool mutex poisoned");
        state.ring.get(key).map(str::to_string)
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerFetcher>> {
        let state = self.state.lock().expect("peer pool mutex poisoned");

        let owner = state.ring.get(key)?;
        if owner == self.self_url {
            return None;
        }

        tracing::debug!("picked peer {} for key {}", owner, key);
        let fetcher = state.fetchers.get(owner)?.clone();
        Some(fetcher)
    }
}

/// HTTP client for one peer. `base_url` already ends in the base path, so a
/// fetch only appends the escaped group and key.
pub struct HttpFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_with_retry(
        &self,
        url: String,
        timeout: Duration,
        attempts: usize,
    ) -> Result<reqwest::Response> {
        let mut delay_ms = 150u64;

        for attempt in 0..attempts {
            let response = self.client.get(url.clone()).timeout(timeout).send().await;

            match response {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if attempt + 1 == attempts {
                        return Err(anyhow::anyhow!(e));
                    }
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                }
            }
        }

        Err(anyhow::anyhow!("Retry attempts exhausted"))
    }
}

#[async_trait]
impl PeerFetcher for HttpFetcher {
    async fn fetch(&self, group: &str, key: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(key),
        );

        let response = self
            .get_with_retry(url, FETCH_TIMEOUT, FETCH_ATTEMPTS)
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("peer returned {}", response.status()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
