//! One independently locked shard of the sharded cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock, RwLockUpgradableReadGuard};

use crate::{CacheKey, ValueComparer};

/// Mutable item fields, guarded per item.
///
/// The per-item mutex lets `last_used` refreshes and value overwrites happen
/// while only the upgradeable-shared bucket lock is held; concurrent readers
/// of the same item observe a stale-but-consistent snapshot, never a torn
/// value.
struct ItemState<V> {
    value: V,
    last_used: Instant,
}

struct BucketItem<V> {
    state: Mutex<ItemState<V>>,
}

impl<V> BucketItem<V> {
    fn new(value: V) -> Self {
        Self {
            state: Mutex::new(ItemState {
                value,
                last_used: Instant::now(),
            }),
        }
    }
}

/// Hash index of items stamped with last-used time; no recency ordering.
///
/// Every mutation path probes under an upgradeable shared lock and escalates
/// to the exclusive lock only to insert or remove entries, so lookups and
/// in-place updates on different items keep each other unblocked.
pub(crate) struct CacheBucket<K, V> {
    items: RwLock<HashMap<K, BucketItem<V>>>,
    comparer: Arc<dyn ValueComparer<V>>,
}

impl<K, V> CacheBucket<K, V>
where
    K: CacheKey + Clone,
    V: Clone,
{
    pub(crate) fn new(comparer: Arc<dyn ValueComparer<V>>) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            comparer,
        }
    }

    /// Snapshot of the live item count.
    pub(crate) fn count(&self) -> usize {
        self.items.read().len()
    }

    pub(crate) fn insert_or_update(&self, key: K, value: V) {
        let items = self.items.upgradable_read();
        if let Some(item) = items.get(&key) {
            let mut state = item.state.lock();
            if !self.comparer.equals(&state.value, &value) {
                state.value = value;
            }
            // Equal or not, the item was used.
            state.last_used = Instant::now();
        } else {
            let mut items = RwLockUpgradableReadGuard::upgrade(items);
            items.insert(key, BucketItem::new(value));
        }
    }

    pub(crate) fn try_get(&self, key: &K) -> Option<V> {
        let items = self.items.upgradable_read();
        items.get(key).map(|item| {
            let mut state = item.state.lock();
            state.last_used = Instant::now();
            state.value.clone()
        })
    }

    /// Removes every item idle longer than `max_age`; returns how many were
    /// evicted.
    ///
    /// The scan runs under the upgradeable shared lock and only escalates to
    /// the exclusive lock when something must actually be removed, so the
    /// cost of a sweep is proportional to the live bucket size, not to the
    /// evicted count.
    pub(crate) fn cleanup(&self, max_age: Duration) -> usize {
        let items = self.items.upgradable_read();
        let now = Instant::now();
        let expired: Vec<K> = items
            .iter()
            .filter(|(_, item)| {
                let state = item.state.lock();
                now.saturating_duration_since(state.last_used) > max_age
            })
            .map(|(key, _)| key.clone())
            .collect();
        if expired.is_empty() {
            return 0;
        }
        let mut items = RwLockUpgradableReadGuard::upgrade(items);
        let mut removed = 0;
        for key in &expired {
            if items.remove(key).is_some() {
                removed += 1;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefaultComparer;
    use std::thread;

    fn bucket() -> CacheBucket<String, String> {
        CacheBucket::new(Arc::new(DefaultComparer))
    }

    #[test]
    fn insert_get_and_count() {
        let bucket = bucket();
        bucket.insert_or_update("k".to_string(), "v".to_string());
        assert_eq!(bucket.count(), 1);
        assert_eq!(bucket.try_get(&"k".to_string()), Some("v".to_string()));
        assert_eq!(bucket.try_get(&"missing".to_string()), None);
    }

    #[test]
    fn update_overwrites_only_unequal_values() {
        let always_equal = Arc::new(|_: &String, _: &String| true);
        let bucket: CacheBucket<String, String> = CacheBucket::new(always_equal);
        bucket.insert_or_update("k".to_string(), "first".to_string());
        bucket.insert_or_update("k".to_string(), "second".to_string());
        assert_eq!(bucket.try_get(&"k".to_string()), Some("first".to_string()));

        let bucket = self::bucket();
        bucket.insert_or_update("k".to_string(), "first".to_string());
        bucket.insert_or_update("k".to_string(), "second".to_string());
        assert_eq!(bucket.try_get(&"k".to_string()), Some("second".to_string()));
    }

    #[test]
    fn cleanup_removes_only_idle_items() {
        let bucket = bucket();
        bucket.insert_or_update("old".to_string(), "v".to_string());
        thread::sleep(Duration::from_millis(50));
        bucket.insert_or_update("fresh".to_string(), "v".to_string());

        let removed = bucket.cleanup(Duration::from_millis(25));
        assert_eq!(removed, 1);
        assert_eq!(bucket.try_get(&"old".to_string()), None);
        assert_eq!(bucket.try_get(&"fresh".to_string()), Some("v".to_string()));
    }

    #[test]
    fn get_refreshes_last_used() {
        let bucket = bucket();
        bucket.insert_or_update("k".to_string(), "v".to_string());
        thread::sleep(Duration::from_millis(50));
        // Reading stamps the item as fresh again.
        bucket.try_get(&"k".to_string());
        assert_eq!(bucket.cleanup(Duration::from_millis(25)), 0);
        assert_eq!(bucket.count(), 1);
    }

    #[test]
    fn cleanup_of_empty_bucket_is_a_no_op() {
        let bucket = bucket();
        assert_eq!(bucket.cleanup(Duration::ZERO), 0);
    }
}
