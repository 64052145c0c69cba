use crate::Result;

/// Common contract implemented by all three cache engines.
///
/// The contract is deliberately small: insert-or-update and lookup. Engines
/// differ only in locking discipline and eviction trigger, so code written
/// against this trait can swap engines without change.
///
/// # Examples
///
/// ```
/// use tricache::{Cache, Countable, LruCache, ShardedCache, SpinLruCache};
///
/// fn exercise(cache: &(impl Cache<String, String> + Countable)) -> tricache::Result<()> {
///     cache.insert_or_update("key".to_string(), "value".to_string())?;
///     assert_eq!(cache.try_get(&"key".to_string())?, Some("value".to_string()));
///     assert_eq!(cache.count(), 1);
///     Ok(())
/// }
///
/// exercise(&LruCache::new()).unwrap();
/// exercise(&SpinLruCache::new()).unwrap();
/// exercise(&ShardedCache::new()).unwrap();
/// ```
pub trait Cache<K, V> {
    /// Inserts `value` under `key`, or updates the existing entry.
    ///
    /// When the stored value compares equal to `value` (per the engine's
    /// [`ValueComparer`](crate::ValueComparer)) the entry is only refreshed
    /// for eviction purposes, not overwritten.
    ///
    /// # Errors
    ///
    /// [`CacheError::AbsentKey`](crate::CacheError::AbsentKey) if `key` is the
    /// absent sentinel; no state is mutated in that case.
    fn insert_or_update(&self, key: K, value: V) -> Result<()>;

    /// Looks up `key`, returning a clone of the cached value.
    ///
    /// A hit counts as a use: the entry is moved to the most-recently-used
    /// position (LRU engines) or its `last_used` stamp is refreshed (sharded
    /// engine). A miss is a normal negative result, not an error.
    ///
    /// # Errors
    ///
    /// [`CacheError::AbsentKey`](crate::CacheError::AbsentKey) if `key` is the
    /// absent sentinel.
    fn try_get(&self, key: &K) -> Result<Option<V>>;
}

/// Size introspection, separate from the operational contract.
pub trait Countable {
    /// Number of live entries, as a best-effort snapshot.
    ///
    /// The value is not linearized with concurrent mutators or background
    /// sweeps; use it for monitoring, not for control flow.
    fn count(&self) -> usize;
}
