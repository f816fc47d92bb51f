//! Transport Layer
//!
//! Defines the two capabilities the cache core needs from its fleet, plus
//! their HTTP binding.
//!
//! ## Core Concepts
//! - **Picking**: [`PeerPicker`] resolves a key to the peer that owns it,
//!   answering nothing when the owner is the local node (a node never calls
//!   itself over the network).
//! - **Fetching**: [`PeerFetcher`] retrieves the serialized value for a
//!   (group, key) pair from one remote node.
//! - **Binding**: [`HttpPool`] implements both over HTTP: an axum handler
//!   serves `{base_path}{group}/{key}` and a reqwest client fetches it. The
//!   core never learns how peers are discovered or transported.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

pub mod handlers;
pub mod pool;
pub mod protocol;

pub use handlers::router;
pub use pool::{HttpFetcher, HttpPool};

/// Client side of the peer protocol: produces the value bytes for a
/// (group, key) pair from a remote node.
#[async_trait]
pub trait PeerFetcher: Send + Sync {
    async fn fetch(&self, group: &str, key: &str) -> Result<Vec<u8>>;
}

/// Locates the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the owning peer, or `None` when the owner is the local node
    /// or no peers are registered.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerFetcher>>;
}
