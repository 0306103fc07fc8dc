//! # hotcache
//!
//! Fixed-capacity in-memory LRU cache with O(1) get/put.
//!
//! ## Architecture
//! - **HashMap**: AHash for fast lookups (O(1))
//! - **LRU List**: Index-based doubly-linked list for eviction (O(1))
//! - **Sharing**: [`SharedCache`] wraps the cache in a single exclusive lock
//!
//! The core type is [`LruCache`], a single-threaded structure. `get` refreshes
//! recency, so even reads mutate; callers sharing a cache across threads use
//! [`SharedCache`], which holds one `Mutex` over both the map and the ordering
//! for the duration of each operation.

#![warn(missing_docs)]

mod cache;
mod error;
mod lru;
mod stats;

pub use cache::SharedCache;
pub use error::{Error, Result};
pub use lru::LruCache;
pub use stats::{CacheStats, StatsSnapshot};
