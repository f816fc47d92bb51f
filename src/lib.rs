//! Distributed In-Memory Cache Library
//!
//! This library crate defines the building blocks of a cache fleet: a set of peer
//! nodes that together form one logical cache space. Every key has a deterministic
//! home node chosen by consistent hashing, so a lookup arriving at any node is
//! answered from local memory, forwarded to the key's home peer, or materialized
//! by the application-supplied loader.
//!
//! ## Architecture Modules
//! The system is composed of five loosely coupled subsystems:
//!
//! - **`store`**: The local memory layer. A byte-accounted LRU store, the mutex
//!   wrapper that synchronizes it, and the immutable byte view handed to callers.
//! - **`ring`**: The placement layer. A consistent-hash ring with virtual nodes
//!   that maps keys to peer URLs with minimal reshuffling under membership change.
//! - **`flight`**: The coalescing layer. Deduplicates concurrent loads of the same
//!   key so a thundering herd triggers exactly one backing fetch.
//! - **`group`**: The orchestration layer. A `Group` is a named cache namespace
//!   composing the cache, the coalescer, and the peer picker under a single
//!   lookup contract, plus the process-wide group registry.
//! - **`peers`**: The transport layer. Narrow peer capabilities (`PeerPicker`,
//!   `PeerFetcher`) and their HTTP binding: an axum handler exposing the
//!   group/key surface and a reqwest client implementing fetch.

pub mod flight;
pub mod group;
pub mod peers;
pub mod ring;
pub mod store;