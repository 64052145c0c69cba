//! # Tricache
//!
//! Three interchangeable in-process, bounded key-value cache engines sharing
//! one contract ([`Cache`] + [`Countable`]): insert-or-update, lookup, and
//! snapshot size introspection. Each engine trades off a different locking
//! discipline and eviction trigger:
//!
//! - [`LruCache`] - a single reader/writer lock (upgradeable reads) over a
//!   hash index plus a doubly linked recency chain; classic LRU with a hard
//!   item-count limit.
//! - [`SpinLruCache`] - the same LRU structure behind a busy-waiting
//!   [`SpinLock`] instead of a reader/writer lock; no thread ever parks.
//! - [`ShardedCache`] - a fixed array of independently locked buckets with no
//!   recency list; a background sweeper monitors process memory and evicts
//!   items older than an adaptively shrinking age threshold.
//!
//! ## Capabilities, not inheritance
//!
//! Value equality ([`ValueComparer`]), key-to-bucket routing ([`BucketMapper`])
//! and memory measurement ([`MemoryProbe`]) are all passed in at
//! construction, so no-op-update detection, shard placement and "simulated
//! memory" testing need no subtyping.
//!
//! ## Module organization
//!
//! - [`error`](CacheError) - the single `InvalidArgument`-class error
//! - [`key`](CacheKey) - absent-key sentinel modelling
//! - [`comparer`](ValueComparer) - pluggable value equality
//! - `recency_list` - arena-backed O(1) recency chain (internal)
//! - [`spin_lock`](SpinLock) - raw busy-waiting mutex behind [`SpinLruCache`]
//! - [`lru_cache`](LruCache) / [`spin_lru_cache`](SpinLruCache) - the two
//!   LRU engines over a shared core
//! - [`sharded_cache`](ShardedCache) - bucket router + eviction sweeper
//!
//! ## Example
//!
//! ```
//! use tricache::{Cache, Countable, LruCache};
//!
//! let cache = LruCache::with_limit(100);
//! cache.insert_or_update("user:1".to_string(), "alice".to_string())?;
//! assert_eq!(
//!     cache.try_get(&"user:1".to_string())?,
//!     Some("alice".to_string())
//! );
//! assert_eq!(cache.count(), 1);
//! # Ok::<(), tricache::CacheError>(())
//! ```

mod bucket;
mod cleanup_settings;
mod comparer;
mod error;
mod key;
mod lru_cache;
mod lru_core;
mod memory_probe;
mod recency_list;
mod sharded_cache;
mod spin_lock;
mod spin_lru_cache;
mod traits;

pub use cleanup_settings::CleanupSettings;
pub use comparer::{DefaultComparer, ValueComparer};
pub use error::{CacheError, Result};
pub use key::CacheKey;
pub use lru_cache::{LruCache, DEFAULT_CAPACITY};
pub use memory_probe::{FixedMemoryProbe, MemoryProbe, ProcessMemoryProbe};
pub use sharded_cache::{
    default_bucket_mapper, BucketMapper, ShardedCache, DEFAULT_BUCKET_COUNT,
};
pub use spin_lock::{RawSpinLock, SpinLock};
pub use spin_lru_cache::SpinLruCache;
pub use traits::{Cache, Countable};
