use std::time::Duration;

/// Eviction configuration for the sharded cache, immutable after construction.
///
/// The sweeper wakes every [`cleanup_interval`](CleanupSettings::cleanup_interval)
/// and does nothing unless measured memory usage exceeds
/// [`max_memory_size`](CleanupSettings::max_memory_size). When it does, buckets
/// are swept with an age threshold that starts at
/// [`max_object_lifetime`](CleanupSettings::max_object_lifetime) and halves per
/// round, never dropping below
/// [`min_object_lifetime`](CleanupSettings::min_object_lifetime); items younger
/// than the floor are protected regardless of memory pressure.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tricache::CleanupSettings;
///
/// let defaults = CleanupSettings::default();
/// assert_eq!(defaults.cleanup_interval, Duration::from_millis(200));
/// assert_eq!(defaults.max_memory_size, 5 * 1024 * 1024 * 1024);
///
/// let aggressive = CleanupSettings {
///     max_memory_size: 256 * 1024 * 1024,
///     min_object_lifetime: Duration::ZERO,
///     ..CleanupSettings::default()
/// };
/// assert_eq!(aggressive.max_object_lifetime, Duration::from_millis(5000));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CleanupSettings {
    /// How often the background sweeper wakes up.
    pub cleanup_interval: Duration,
    /// Process memory ceiling in bytes; sweeps only run while usage exceeds it.
    pub max_memory_size: u64,
    /// Initial age threshold: items idle longer than this are the first
    /// eviction candidates.
    pub max_object_lifetime: Duration,
    /// Floor for the shrinking age threshold: items idle less than this are
    /// never evicted.
    pub min_object_lifetime: Duration,
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_millis(200),
            max_memory_size: 5 * 1024 * 1024 * 1024, // 5 GiB
            max_object_lifetime: Duration::from_millis(5000),
            min_object_lifetime: Duration::from_millis(500),
        }
    }
}
