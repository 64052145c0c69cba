use thiserror::Error;

/// Error type shared by all cache engines.
///
/// The only failure an engine reports is an invalid argument: both operations
/// reject a key whose [`is_absent`](crate::CacheKey::is_absent) check returns
/// `true` before touching any state. Everything else is normal control flow:
/// a missing key is a negative lookup result, and capacity or memory-pressure
/// eviction is silent background work with no caller-visible signal.
///
/// # Examples
///
/// ```
/// use tricache::{Cache, CacheError, LruCache};
///
/// let cache: LruCache<Option<String>, i32> = LruCache::new();
/// assert_eq!(cache.insert_or_update(None, 42), Err(CacheError::AbsentKey));
/// ```
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// The supplied key is the absent sentinel for its type.
    #[error("invalid argument: cache key is absent")]
    AbsentKey,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
