//! Multi-threaded throughput and memory driver for the three cache engines.
//!
//! Spawns worker threads that interleave inserts and lookups with randomly
//! generated keys and values, then reports elapsed time, throughput, final
//! entry count and probe-measured process memory per engine.

use std::sync::{Arc, Barrier};
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use tricache::{
    Cache, CleanupSettings, Countable, LruCache, MemoryProbe, ProcessMemoryProbe, ShardedCache,
    SpinLruCache,
};

/// Number of concurrent worker threads.
const THREAD_COUNT: usize = 8;

/// Number of items each thread writes to the cache.
const ITEMS_PER_THREAD: usize = 50_000;

/// Cache limit for the count-based engines.
const CACHE_LIMIT: usize = ITEMS_PER_THREAD * 10;

/// Random lookups performed per write.
const READS_PER_WRITE: usize = 5;

/// Length of the random string key.
const KEY_LENGTH: usize = 5;

/// Maximum number of strings per generated value.
const STRINGS_PER_SAMPLE: usize = 50;

/// Maximum length of each generated string.
const SAMPLE_STRING_LENGTH: usize = 200;

#[derive(Clone, PartialEq)]
struct TestData {
    data: Vec<String>,
}

fn create_test_data() -> TestData {
    let size = fastrand::usize(..STRINGS_PER_SAMPLE);
    let data = (0..size)
        .map(|_| "a".repeat(fastrand::usize(..SAMPLE_STRING_LENGTH)))
        .collect();
    TestData { data }
}

fn create_key() -> String {
    (0..KEY_LENGTH).map(|_| fastrand::alphanumeric()).collect()
}

fn run<C>(label: &str, cache: Arc<C>)
where
    C: Cache<String, TestData> + Countable + Send + Sync + 'static,
{
    println!("Cache type: {label}");
    println!(
        "Threads: {THREAD_COUNT}, Items per thread: {ITEMS_PER_THREAD}, Reads per thread: {}",
        ITEMS_PER_THREAD * READS_PER_WRITE
    );

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let started = Instant::now();
    let workers: Vec<_> = (0..THREAD_COUNT)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                for _ in 0..ITEMS_PER_THREAD {
                    if let Err(err) = cache.insert_or_update(create_key(), create_test_data()) {
                        eprintln!("insert failed: {err}");
                        return;
                    }
                    for _ in 0..READS_PER_WRITE {
                        if let Err(err) = cache.try_get(&create_key()) {
                            eprintln!("lookup failed: {err}");
                            return;
                        }
                    }
                }
            })
        })
        .collect();
    for worker in workers {
        let _ = worker.join();
    }
    let elapsed = started.elapsed();

    let total_ops = THREAD_COUNT * ITEMS_PER_THREAD * (1 + READS_PER_WRITE);
    let throughput = total_ops as f64 / elapsed.as_secs_f64();
    println!("Elapsed: {elapsed:?}");
    println!("Throughput: {throughput:.0} ops/sec");
    println!("Final count: {}", cache.count());
    println!(
        "Process memory: {} MiB",
        ProcessMemoryProbe.current_usage() / (1024 * 1024)
    );
    println!();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    run(
        "tricache::LruCache (reader/writer lock)",
        Arc::new(LruCache::with_limit(CACHE_LIMIT)),
    );
    run(
        "tricache::SpinLruCache (spin lock)",
        Arc::new(SpinLruCache::with_limit(CACHE_LIMIT)),
    );
    run(
        "tricache::ShardedCache (memory/age-driven)",
        Arc::new(ShardedCache::with_settings(CleanupSettings {
            max_memory_size: 200 * 1024 * 1024,
            ..CleanupSettings::default()
        })),
    );
}
