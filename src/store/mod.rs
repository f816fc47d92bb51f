//! Local Memory Layer
//!
//! Implements the node-local half of the cache: a size-bounded LRU store and
//! the synchronization shell around it.
//!
//! ## Core Concepts
//! - **Byte accounting**: Every entry is charged `key length + value length`
//!   against the store's byte budget; eviction runs from the least recently
//!   used end until the budget is respected again.
//! - **Views**: Values are handed out as [`ByteView`]s: immutable, cheaply
//!   cloneable, and copied on extraction, so cached bytes can never be
//!   mutated behind the store's back.
//! - **Synchronization**: [`LruStore`] itself is not thread safe; all
//!   concurrent access goes through [`SyncCache`], which holds a mutex and
//!   builds the store lazily on the first insert.

pub mod byteview;
pub mod cache;
pub mod lru;

pub use byteview::{ByteSized, ByteView};
pub use cache::{CacheSnapshot, SyncCache};
pub use lru::LruStore;

#[cfg(test)]
mod tests;
