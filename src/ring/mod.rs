//! Placement Layer
//!
//! Maps keys to their home node with a consistent-hash ring.
//!
//! ## Mechanism
//! - **Virtual nodes**: Each real node contributes `replicas` points to the
//!   ring, hashed from `"{replica_index}{node}"`, which smooths the load
//!   across nodes regardless of how their names hash.
//! - **Placement**: A key belongs to the first ring point clockwise from its
//!   own hash (binary search over the sorted points, wrapping at the end).
//!   All nodes compute the exact same ownership independently, so no
//!   coordination is needed to agree on a key's home.
//! - **Membership change**: Adding a node only claims the arcs in front of
//!   its new points; every other key keeps its previous owner.

use std::collections::HashMap;

/// Ring hash function. Must be used consistently for both node points and
/// keys; the default is CRC-32 (IEEE).
pub type RingHash = fn(&[u8]) -> u32;

/// A consistent-hash ring over node identifiers.
pub struct HashRing {
    hash: RingHash,
    replicas: usize,
    /// All virtual points, sorted ascending.
    points: Vec<u32>,
    /// Point to owning node. On a point collision the first insert wins.
    owners: HashMap<u32, String>,
}

impl HashRing {
    /// Creates an empty ring with `replicas` virtual points per node and the
    /// CRC-32 default hash.
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, crc32fast::hash)
    }

    /// Creates an empty ring with a custom hash function. Tests use this to
    /// make placement predictable.
    pub fn with_hasher(replicas: usize, hash: RingHash) -> Self {
        Self {
            hash,
            replicas,
            points: Vec::new(),
            owners: HashMap::new(),
        }
    }

    /// Registers nodes on the ring.
    ///
    /// Each node contributes `replicas` points; the ring is re-sorted once
    /// after all insertions.
    pub fn add<S: AsRef<str>>(&mut self, nodes: &[S]) {
        for node in nodes {
            let node = node.as_ref();
            for replica in 0..self.replicas {
                let point = (self.hash)(format!("{}{}", replica, node).as_bytes());
                self.points.push(point);
                self.owners
                    .entry(point)
                    .or_insert_with(|| node.to_string());
            }
        }
        self.points.sort_unstable();
    }

    /// Returns the node that owns `key`, or `None` if the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.points.is_empty() {
            return None;
        }

        let hashed = (self.hash)(key.as_bytes());
        let idx = self.points.partition_point(|&point| point < hashed);
        let point = if idx == self.points.len() {
            self.points[0]
        } else {
            self.points[idx]
        };

        self.owners.get(&point).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
