use std::sync::Arc;

use crate::lru_core::LruCore;
use crate::spin_lock::SpinLock;
use crate::{
    Cache, CacheError, CacheKey, Countable, DefaultComparer, Result, ValueComparer, DEFAULT_CAPACITY,
};

/// LRU cache guarded by a spin lock.
///
/// Same data structure and eviction algorithm as [`LruCache`](crate::LruCache)
/// (hash index + recency chain, count-based eviction), but mutual exclusion is
/// a busy-waiting [`SpinLock`] held coarsely for the whole operation. No
/// thread ever blocks in a wait queue; losing contention degrades to spinning,
/// which is the right trade only when critical sections are short and
/// contention is low.
///
/// # Examples
///
/// ```
/// use tricache::{Cache, Countable, SpinLruCache};
///
/// let cache = SpinLruCache::with_limit(2);
/// cache.insert_or_update("a", 1)?;
/// cache.insert_or_update("b", 2)?;
/// cache.insert_or_update("c", 3)?; // evicts "a"
///
/// assert_eq!(cache.try_get(&"a")?, None);
/// assert_eq!(cache.count(), 2);
/// # Ok::<(), tricache::CacheError>(())
/// ```
pub struct SpinLruCache<K: CacheKey, V> {
    core: SpinLock<LruCore<K, V>>,
}

impl<K, V> SpinLruCache<K, V>
where
    K: CacheKey + Clone,
    V: Clone + PartialEq,
{
    /// Creates a cache with the default limit
    /// ([`DEFAULT_CAPACITY`](crate::DEFAULT_CAPACITY)) and structural value
    /// equality.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_CAPACITY)
    }

    /// Creates a cache holding at most `limit` entries, with structural value
    /// equality.
    pub fn with_limit(limit: usize) -> Self {
        Self::with_comparer(limit, Arc::new(DefaultComparer))
    }
}

impl<K, V> SpinLruCache<K, V>
where
    K: CacheKey + Clone,
    V: Clone,
{
    /// Creates a cache with an explicit value-equality policy.
    pub fn with_comparer(limit: usize, comparer: Arc<dyn ValueComparer<V>>) -> Self {
        Self {
            core: SpinLock::new(LruCore::new(limit, comparer)),
        }
    }
}

impl<K, V> Default for SpinLruCache<K, V>
where
    K: CacheKey + Clone,
    V: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Cache<K, V> for SpinLruCache<K, V>
where
    K: CacheKey + Clone,
    V: Clone,
{
    fn insert_or_update(&self, key: K, value: V) -> Result<()> {
        if key.is_absent() {
            return Err(CacheError::AbsentKey);
        }
        let mut core = self.core.lock();
        match core.probe(&key) {
            Some(id) => {
                if core.is_equal_value(id, &value) {
                    core.touch(id);
                } else {
                    core.overwrite(id, value);
                }
            }
            None => core.insert(key, value),
        }
        Ok(())
    }

    fn try_get(&self, key: &K) -> Result<Option<V>> {
        if key.is_absent() {
            return Err(CacheError::AbsentKey);
        }
        let mut core = self.core.lock();
        match core.probe(key) {
            Some(id) => {
                let value = core.value_clone(id);
                core.touch(id);
                Ok(value)
            }
            None => Ok(None),
        }
    }
}

impl<K: CacheKey + Clone, V: Clone> Countable for SpinLruCache<K, V> {
    fn count(&self) -> usize {
        self.core.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn insert_then_get_round_trips() {
        let cache: SpinLruCache<String, i32> = SpinLruCache::new();
        cache.insert_or_update("key".to_string(), 7).unwrap();
        assert_eq!(cache.try_get(&"key".to_string()).unwrap(), Some(7));
        assert_eq!(cache.count(), 1);
    }

    #[test]
    fn absent_key_is_rejected() {
        let cache: SpinLruCache<Option<u32>, u32> = SpinLruCache::new();
        assert_eq!(cache.insert_or_update(None, 1), Err(CacheError::AbsentKey));
        assert_eq!(cache.try_get(&None), Err(CacheError::AbsentKey));
        assert_eq!(cache.count(), 0);
    }

    #[test]
    fn eviction_order_matches_recency() {
        let cache = SpinLruCache::with_limit(2);
        cache.insert_or_update("a", 1).unwrap();
        cache.insert_or_update("b", 2).unwrap();
        // Touch "a" so "b" is the eviction candidate.
        cache.try_get(&"a").unwrap();
        cache.insert_or_update("c", 3).unwrap();
        assert_eq!(cache.try_get(&"b").unwrap(), None);
        assert_eq!(cache.try_get(&"a").unwrap(), Some(1));
    }

    #[test]
    fn concurrent_disjoint_inserts_are_all_kept() {
        let cache: &'static SpinLruCache<String, usize> =
            Box::leak(Box::new(SpinLruCache::new()));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                thread::spawn(move || {
                    for i in 0..500 {
                        cache
                            .insert_or_update(format!("t{t}-{i}"), i)
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.count(), 4 * 500);
    }
}
