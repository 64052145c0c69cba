use std::sync::Arc;

use parking_lot::{RwLock, RwLockUpgradableReadGuard};

use crate::lru_core::LruCore;
use crate::{Cache, CacheError, CacheKey, Countable, DefaultComparer, Result, ValueComparer};

/// Default entry limit for the LRU engines.
pub const DEFAULT_CAPACITY: usize = 100_000;

/// LRU cache guarded by a single reader/writer lock.
///
/// A hash index gives O(1) lookups and a doubly linked recency chain gives
/// O(1) move-to-front and remove-from-tail, so every operation is O(1) plus
/// locking. Eviction is count-based: an insert that breaches the configured
/// limit synchronously removes the least-recently-used entry on the inserting
/// thread.
///
/// # Locking discipline
///
/// Operations take an upgradeable shared lock for the index probe and
/// escalate to the exclusive lock only for the mutation window (chain move,
/// value overwrite, insert, eviction). Plain readers are blocked only during
/// that brief exclusive window; [`count`](Countable::count) uses an ordinary
/// shared read. Note that the touch performed on a value-equal re-insert
/// still escalates to the exclusive lock even though no field changes; the
/// chain move is a mutation like any other.
///
/// Operations are linearizable with respect to the index and chain: each
/// insert or lookup appears to execute atomically relative to the others.
///
/// # Examples
///
/// ```
/// use tricache::{Cache, Countable, LruCache};
///
/// let cache = LruCache::with_limit(2);
/// cache.insert_or_update("a", 1)?;
/// cache.insert_or_update("b", 2)?;
/// cache.insert_or_update("c", 3)?; // evicts "a"
///
/// assert_eq!(cache.try_get(&"a")?, None);
/// assert_eq!(cache.try_get(&"c")?, Some(3));
/// assert_eq!(cache.count(), 2);
/// # Ok::<(), tricache::CacheError>(())
/// ```
pub struct LruCache<K: CacheKey, V> {
    core: RwLock<LruCore<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: CacheKey + Clone,
    V: Clone + PartialEq,
{
    /// Creates a cache with the default limit ([`DEFAULT_CAPACITY`]) and
    /// structural value equality.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_CAPACITY)
    }

    /// Creates a cache holding at most `limit` entries, with structural value
    /// equality.
    pub fn with_limit(limit: usize) -> Self {
        Self::with_comparer(limit, Arc::new(DefaultComparer))
    }
}

impl<K, V> LruCache<K, V>
where
    K: CacheKey + Clone,
    V: Clone,
{
    /// Creates a cache with an explicit value-equality policy.
    ///
    /// The comparer decides whether an update is a true no-op: equal values
    /// only refresh the entry's recency instead of overwriting it.
    pub fn with_comparer(limit: usize, comparer: Arc<dyn ValueComparer<V>>) -> Self {
        Self {
            core: RwLock::new(LruCore::new(limit, comparer)),
        }
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: CacheKey + Clone,
    V: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: CacheKey + Clone,
    V: Clone,
{
    fn insert_or_update(&self, key: K, value: V) -> Result<()> {
        if key.is_absent() {
            return Err(CacheError::AbsentKey);
        }
        let core = self.core.upgradable_read();
        match core.probe(&key) {
            Some(id) => {
                // Equal values are a touch, not an overwrite.
                let equal = core.is_equal_value(id, &value);
                let mut core = RwLockUpgradableReadGuard::upgrade(core);
                if equal {
                    core.touch(id);
                } else {
                    core.overwrite(id, value);
                }
            }
            None => {
                let mut core = RwLockUpgradableReadGuard::upgrade(core);
                core.insert(key, value);
            }
        }
        Ok(())
    }

    fn try_get(&self, key: &K) -> Result<Option<V>> {
        if key.is_absent() {
            return Err(CacheError::AbsentKey);
        }
        let core = self.core.upgradable_read();
        match core.probe(key) {
            Some(id) => {
                let value = core.value_clone(id);
                // Every read counts as a use for eviction purposes.
                let mut core = RwLockUpgradableReadGuard::upgrade(core);
                core.touch(id);
                Ok(value)
            }
            None => Ok(None),
        }
    }
}

impl<K: CacheKey + Clone, V: Clone> Countable for LruCache<K, V> {
    fn count(&self) -> usize {
        self.core.read().len()
    }
}
