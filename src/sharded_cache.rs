use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info, trace};

use crate::bucket::CacheBucket;
use crate::{
    Cache, CacheError, CacheKey, CleanupSettings, Countable, DefaultComparer, MemoryProbe,
    ProcessMemoryProbe, Result, ValueComparer,
};

/// Default number of buckets in a [`ShardedCache`].
pub const DEFAULT_BUCKET_COUNT: usize = 64;

/// Pure function assigning a key to a bucket index.
///
/// The router must be deterministic: the same key maps to the same bucket on
/// every call for the engine's lifetime. Returned indices are reduced modulo
/// the bucket count, so a custom router can never index out of bounds.
pub type BucketMapper<K> = Box<dyn Fn(&K) -> usize + Send + Sync>;

/// Default key-to-bucket mapping: the low 6 bits of the key's hash.
///
/// With the default [`DEFAULT_BUCKET_COUNT`] of 64 buckets this covers the
/// whole bucket array.
pub fn default_bucket_mapper<K: Hash>(key: &K) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() & 0x3f) as usize
}

/// State shared between caller threads and the eviction sweeper.
struct SweepShared<K, V> {
    buckets: Box<[CacheBucket<K, V>]>,
    settings: CleanupSettings,
    probe: Box<dyn MemoryProbe>,
    /// Non-reentrancy guard: a tick that finds it set skips entirely.
    sweep_active: AtomicBool,
    shutdown: Mutex<bool>,
    wakeup: Condvar,
}

/// Sharded cache with memory-pressure-driven, age-biased eviction.
///
/// Keys are routed to one of a fixed number of independently locked buckets,
/// so contention is reduced roughly by a factor of the bucket count compared
/// to the globally locked LRU engines. There is no recency list and no hard
/// item-count ceiling; instead a background sweeper thread wakes every
/// [`cleanup_interval`](CleanupSettings::cleanup_interval), and when the
/// memory probe reports usage above
/// [`max_memory_size`](CleanupSettings::max_memory_size) it sweeps all buckets
/// in parallel with an age threshold that starts at
/// [`max_object_lifetime`](CleanupSettings::max_object_lifetime) and halves
/// per round until memory drops under the ceiling or the threshold reaches
/// [`min_object_lifetime`](CleanupSettings::min_object_lifetime). Items
/// younger than the floor are never evicted, whatever the pressure.
///
/// Dropping the cache signals the sweeper and joins it.
///
/// # Examples
///
/// ```
/// use tricache::{Cache, Countable, ShardedCache};
///
/// let cache: ShardedCache<String, String> = ShardedCache::new();
/// cache.insert_or_update("key".to_string(), "value".to_string())?;
/// assert_eq!(cache.try_get(&"key".to_string())?, Some("value".to_string()));
/// assert_eq!(cache.count(), 1);
/// # Ok::<(), tricache::CacheError>(())
/// ```
pub struct ShardedCache<K: CacheKey, V> {
    shared: Arc<SweepShared<K, V>>,
    mapper: BucketMapper<K>,
    sweeper: Option<JoinHandle<()>>,
}

impl<K, V> ShardedCache<K, V>
where
    K: CacheKey + Clone + Send + Sync + 'static,
    V: Clone + PartialEq + Send + Sync + 'static,
{
    /// Creates a cache with all parameters at their defaults: 64 buckets,
    /// hash-low-6-bits routing, structural value equality, default
    /// [`CleanupSettings`] and the process-memory probe.
    pub fn new() -> Self {
        Self::with_settings(CleanupSettings::default())
    }

    /// Creates a cache with explicit eviction settings.
    pub fn with_settings(settings: CleanupSettings) -> Self {
        Self::with_comparer(Arc::new(DefaultComparer), settings)
    }
}

impl<K, V> ShardedCache<K, V>
where
    K: CacheKey + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a cache with an explicit value-equality policy.
    pub fn with_comparer(comparer: Arc<dyn ValueComparer<V>>, settings: CleanupSettings) -> Self {
        Self::with_mapper(
            DEFAULT_BUCKET_COUNT,
            Box::new(default_bucket_mapper::<K>),
            comparer,
            settings,
        )
    }

    /// Creates a cache with an explicit bucket count and key-to-bucket router.
    ///
    /// # Panics
    ///
    /// Panics if `bucket_count` is zero.
    pub fn with_mapper(
        bucket_count: usize,
        mapper: BucketMapper<K>,
        comparer: Arc<dyn ValueComparer<V>>,
        settings: CleanupSettings,
    ) -> Self {
        Self::with_memory_probe(
            bucket_count,
            mapper,
            comparer,
            settings,
            Box::new(ProcessMemoryProbe),
        )
    }

    /// Fully explicit constructor, including the memory probe.
    ///
    /// Injecting a [`FixedMemoryProbe`](crate::FixedMemoryProbe) here is how
    /// tests simulate memory pressure without touching real process memory.
    ///
    /// # Panics
    ///
    /// Panics if `bucket_count` is zero.
    pub fn with_memory_probe(
        bucket_count: usize,
        mapper: BucketMapper<K>,
        comparer: Arc<dyn ValueComparer<V>>,
        settings: CleanupSettings,
        probe: Box<dyn MemoryProbe>,
    ) -> Self {
        assert!(bucket_count > 0, "bucket count must be non-zero");
        let buckets: Box<[CacheBucket<K, V>]> = (0..bucket_count)
            .map(|_| CacheBucket::new(Arc::clone(&comparer)))
            .collect();
        let shared = Arc::new(SweepShared {
            buckets,
            settings,
            probe,
            sweep_active: AtomicBool::new(false),
            shutdown: Mutex::new(false),
            wakeup: Condvar::new(),
        });
        let sweeper = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || sweeper_loop(shared))
        };
        Self {
            shared,
            mapper,
            sweeper: Some(sweeper),
        }
    }

    fn bucket_for(&self, key: &K) -> &CacheBucket<K, V> {
        let index = (self.mapper)(key) % self.shared.buckets.len();
        &self.shared.buckets[index]
    }
}

impl<K, V> Default for ShardedCache<K, V>
where
    K: CacheKey + Clone + Send + Sync + 'static,
    V: Clone + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Cache<K, V> for ShardedCache<K, V>
where
    K: CacheKey + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn insert_or_update(&self, key: K, value: V) -> Result<()> {
        if key.is_absent() {
            return Err(CacheError::AbsentKey);
        }
        self.bucket_for(&key).insert_or_update(key, value);
        Ok(())
    }

    fn try_get(&self, key: &K) -> Result<Option<V>> {
        if key.is_absent() {
            return Err(CacheError::AbsentKey);
        }
        Ok(self.bucket_for(key).try_get(key))
    }
}

impl<K: CacheKey, V> Countable for ShardedCache<K, V>
where
    K: CacheKey + Clone,
    V: Clone,
{
    fn count(&self) -> usize {
        self.shared.buckets.iter().map(CacheBucket::count).sum()
    }
}

impl<K: CacheKey, V> Drop for ShardedCache<K, V> {
    fn drop(&mut self) {
        *self.shared.shutdown.lock() = true;
        self.shared.wakeup.notify_all();
        if let Some(handle) = self.sweeper.take() {
            let _ = handle.join();
        }
    }
}

/// Clears the sweep-in-progress flag when a tick ends, panicking included, so
/// a failed tick cannot wedge future sweeps.
struct SweepGuard<'a>(&'a AtomicBool);

impl Drop for SweepGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn sweeper_loop<K, V>(shared: Arc<SweepShared<K, V>>)
where
    K: CacheKey + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    debug!(
        interval_ms = shared.settings.cleanup_interval.as_millis() as u64,
        buckets = shared.buckets.len(),
        "eviction sweeper started"
    );
    loop {
        {
            let mut stopped = shared.shutdown.lock();
            if !*stopped {
                let _ = shared
                    .wakeup
                    .wait_for(&mut stopped, shared.settings.cleanup_interval);
            }
            if *stopped {
                break;
            }
        }
        run_sweep_tick(&shared);
    }
    debug!("eviction sweeper stopped");
}

fn run_sweep_tick<K, V>(shared: &SweepShared<K, V>)
where
    K: CacheKey + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    let settings = &shared.settings;
    let usage = shared.probe.current_usage();
    if usage <= settings.max_memory_size {
        trace!(usage, "memory under ceiling; nothing to sweep");
        return;
    }
    // Compare-and-swap so two concurrently evaluated ticks can never both
    // sweep; the loser skips its tick entirely.
    if shared
        .sweep_active
        .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
        .is_err()
    {
        debug!("sweep already in progress; skipping tick");
        return;
    }
    let _guard = SweepGuard(&shared.sweep_active);

    info!(
        usage,
        ceiling = settings.max_memory_size,
        "memory over ceiling; starting adaptive sweep"
    );
    let mut age = settings.max_object_lifetime;
    loop {
        let removed = sweep_round(shared, age);
        let usage = shared.probe.current_usage();
        debug!(age_ms = age.as_millis() as u64, removed, usage, "sweep round finished");
        if usage <= settings.max_memory_size {
            info!(usage, "memory back under ceiling");
            break;
        }
        if age <= settings.min_object_lifetime {
            // Floor reached with memory still over the ceiling: younger items
            // stay protected, so there is nothing further to shrink.
            info!(usage, "age floor reached; ending sweep");
            break;
        }
        age = std::cmp::max(age / 2, settings.min_object_lifetime);
    }
}

/// One parallel pass over all buckets with the given age threshold.
fn sweep_round<K, V>(shared: &SweepShared<K, V>, age: Duration) -> usize
where
    K: CacheKey + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    std::thread::scope(|scope| {
        let handles: Vec<_> = shared
            .buckets
            .iter()
            .map(|bucket| scope.spawn(move || bucket.cleanup(age)))
            .collect();
        handles
            .into_iter()
            // A panicked bucket sweep is fatal only to this round.
            .map(|handle| handle.join().unwrap_or(0))
            .sum()
    })
}
