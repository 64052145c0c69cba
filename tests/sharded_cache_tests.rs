//! Sweep behavior of the sharded engine, driven through a simulated memory
//! probe so no test depends on real process memory.

use serial_test::serial;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tricache::{
    default_bucket_mapper, Cache, CleanupSettings, Countable, DefaultComparer, FixedMemoryProbe,
    ShardedCache,
};

fn cache_with_probe(
    settings: CleanupSettings,
    probe_bytes: u64,
) -> ShardedCache<String, String> {
    ShardedCache::with_memory_probe(
        16,
        Box::new(default_bucket_mapper::<String>),
        Arc::new(DefaultComparer),
        settings,
        Box::new(FixedMemoryProbe::new(probe_bytes)),
    )
}

#[test]
#[serial]
fn no_sweep_happens_while_memory_is_under_the_ceiling() {
    let settings = CleanupSettings {
        cleanup_interval: Duration::from_millis(20),
        max_memory_size: 1024 * 1024,
        max_object_lifetime: Duration::from_millis(10),
        min_object_lifetime: Duration::ZERO,
    };
    // Probe reports zero usage: the sweeper must never evict.
    let cache = cache_with_probe(settings, 0);
    for i in 0..50 {
        cache
            .insert_or_update(format!("key{i}"), "value".to_string())
            .unwrap();
    }
    thread::sleep(Duration::from_millis(200));
    assert_eq!(cache.count(), 50);
}

#[test]
#[serial]
fn over_age_items_are_evicted_under_memory_pressure() {
    let settings = CleanupSettings {
        cleanup_interval: Duration::from_millis(20),
        max_memory_size: 1000,
        max_object_lifetime: Duration::from_millis(50),
        min_object_lifetime: Duration::from_millis(10),
    };
    // Probe is always over the ceiling, so every tick sweeps.
    let cache = cache_with_probe(settings, u64::MAX);
    for i in 0..50 {
        cache
            .insert_or_update(format!("key{i}"), "value".to_string())
            .unwrap();
    }
    // Let the items age past the threshold and give the sweeper a few ticks.
    thread::sleep(Duration::from_millis(400));
    assert_eq!(cache.count(), 0);
}

#[test]
#[serial]
fn items_younger_than_the_floor_are_never_evicted() {
    let settings = CleanupSettings {
        cleanup_interval: Duration::from_millis(20),
        max_memory_size: 1000,
        max_object_lifetime: Duration::from_secs(30),
        min_object_lifetime: Duration::from_secs(30),
    };
    let cache = cache_with_probe(settings, u64::MAX);
    for i in 0..50 {
        cache
            .insert_or_update(format!("key{i}"), "value".to_string())
            .unwrap();
    }
    // Heavy simulated pressure, many ticks: fresh items must all survive.
    thread::sleep(Duration::from_millis(300));
    assert_eq!(cache.count(), 50);
}

#[test]
#[serial]
fn zero_floor_sweeps_everything_within_one_interval() {
    let settings = CleanupSettings {
        cleanup_interval: Duration::from_millis(50),
        max_memory_size: 1000,
        max_object_lifetime: Duration::from_millis(100),
        min_object_lifetime: Duration::ZERO,
    };
    let cache = cache_with_probe(settings, u64::MAX);
    for i in 0..100 {
        cache
            .insert_or_update(format!("key{i}"), "value".to_string())
            .unwrap();
    }
    // One interval plus slack: adaptive halving reaches age zero and the
    // whole cache is emptied even though memory never drops.
    thread::sleep(Duration::from_millis(500));
    assert_eq!(cache.count(), 0);
}

#[test]
#[serial]
fn pressure_relief_stops_the_sweep_between_ticks() {
    let settings = CleanupSettings {
        cleanup_interval: Duration::from_millis(20),
        max_memory_size: 1000,
        max_object_lifetime: Duration::from_millis(40),
        min_object_lifetime: Duration::from_millis(10),
    };
    let probe = Arc::new(FixedMemoryProbe::new(u64::MAX));
    struct SharedProbe(Arc<FixedMemoryProbe>);
    impl tricache::MemoryProbe for SharedProbe {
        fn current_usage(&self) -> u64 {
            self.0.current_usage()
        }
    }
    let cache: ShardedCache<String, String> = ShardedCache::with_memory_probe(
        16,
        Box::new(default_bucket_mapper::<String>),
        Arc::new(DefaultComparer),
        settings,
        Box::new(SharedProbe(Arc::clone(&probe))),
    );

    cache
        .insert_or_update("doomed".to_string(), "value".to_string())
        .unwrap();
    thread::sleep(Duration::from_millis(200));
    assert_eq!(cache.count(), 0);

    // Memory back under the ceiling: new items are left alone from now on.
    probe.set(0);
    cache
        .insert_or_update("safe".to_string(), "value".to_string())
        .unwrap();
    thread::sleep(Duration::from_millis(200));
    assert_eq!(cache.count(), 1);
    assert_eq!(
        cache.try_get(&"safe".to_string()).unwrap(),
        Some("value".to_string())
    );
}

#[test]
#[serial]
fn recently_used_items_survive_an_age_sweep() {
    let settings = CleanupSettings {
        cleanup_interval: Duration::from_millis(25),
        max_memory_size: 1000,
        max_object_lifetime: Duration::from_millis(150),
        min_object_lifetime: Duration::from_millis(150),
    };
    let cache = cache_with_probe(settings, u64::MAX);
    cache
        .insert_or_update("hot".to_string(), "value".to_string())
        .unwrap();
    cache
        .insert_or_update("cold".to_string(), "value".to_string())
        .unwrap();

    // Keep touching "hot" so its last-used stamp stays fresh while "cold"
    // ages past the threshold.
    for _ in 0..20 {
        thread::sleep(Duration::from_millis(25));
        cache.try_get(&"hot".to_string()).unwrap();
    }

    assert_eq!(
        cache.try_get(&"hot".to_string()).unwrap(),
        Some("value".to_string())
    );
    assert_eq!(cache.try_get(&"cold".to_string()).unwrap(), None);
}

#[test]
fn bucket_routing_is_stable_for_a_key() {
    // Route everything to one bucket; the cache must still behave correctly.
    let cache: ShardedCache<String, i32> = ShardedCache::with_mapper(
        8,
        Box::new(|_| 3),
        Arc::new(DefaultComparer),
        CleanupSettings::default(),
    );
    for i in 0..100 {
        cache.insert_or_update(format!("key{i}"), i).unwrap();
    }
    assert_eq!(cache.count(), 100);
    for i in 0..100 {
        assert_eq!(cache.try_get(&format!("key{i}")).unwrap(), Some(i));
    }
}

#[test]
fn custom_equality_policy_suppresses_value_overwrites() {
    let always_equal = Arc::new(|_: &String, _: &String| true);
    let cache: ShardedCache<String, String> =
        ShardedCache::with_comparer(always_equal, CleanupSettings::default());
    cache
        .insert_or_update("k".to_string(), "first".to_string())
        .unwrap();
    cache
        .insert_or_update("k".to_string(), "second".to_string())
        .unwrap();
    assert_eq!(
        cache.try_get(&"k".to_string()).unwrap(),
        Some("first".to_string())
    );
}
