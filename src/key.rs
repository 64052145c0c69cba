use std::hash::Hash;
use std::sync::Arc;

/// Marker trait for types usable as cache keys.
///
/// Besides the hashing and equality bounds every engine needs, the trait
/// models the "absent key" sentinel: a key value that is not allowed to be
/// stored. Both cache operations check [`is_absent`](CacheKey::is_absent)
/// before touching any state and fail with
/// [`CacheError::AbsentKey`](crate::CacheError::AbsentKey) when it returns
/// `true`, so a rejected call never mutates the cache and repeated attempts
/// are idempotent.
///
/// For plain key types (`String`, integers, `&str`, ...) there is no absent
/// value and the default implementation returns `false`. `Option<K>` keys
/// treat `None` as absent, which is the closest Rust rendition of a nullable
/// key.
///
/// # Examples
///
/// ```
/// use tricache::CacheKey;
///
/// assert!(!"key".is_absent());
/// assert!(!42u64.is_absent());
///
/// let missing: Option<String> = None;
/// assert!(missing.is_absent());
/// assert!(!Some("key".to_string()).is_absent());
/// ```
pub trait CacheKey: Eq + Hash {
    /// Returns `true` if this key value is the absent sentinel for its type.
    fn is_absent(&self) -> bool {
        false
    }
}

impl CacheKey for String {}
impl<'a> CacheKey for &'a str {}
impl CacheKey for Arc<str> {}

impl CacheKey for i8 {}
impl CacheKey for i16 {}
impl CacheKey for i32 {}
impl CacheKey for i64 {}
impl CacheKey for i128 {}
impl CacheKey for isize {}

impl CacheKey for u8 {}
impl CacheKey for u16 {}
impl CacheKey for u32 {}
impl CacheKey for u64 {}
impl CacheKey for u128 {}
impl CacheKey for usize {}

impl CacheKey for bool {}
impl CacheKey for char {}

impl<K: CacheKey> CacheKey for Option<K> {
    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

impl<K: CacheKey> CacheKey for Vec<K> {}

impl<A: CacheKey, B: CacheKey> CacheKey for (A, B) {
    fn is_absent(&self) -> bool {
        self.0.is_absent() || self.1.is_absent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_keys_are_never_absent() {
        assert!(!"key".is_absent());
        assert!(!String::from("key").is_absent());
        assert!(!0u32.is_absent());
        assert!(!false.is_absent());
    }

    #[test]
    fn option_none_is_absent() {
        let none: Option<u32> = None;
        assert!(none.is_absent());
        assert!(!Some(1u32).is_absent());
    }

    #[test]
    fn tuple_is_absent_if_any_component_is() {
        assert!((Some(1u32), None::<u32>).is_absent());
        assert!(!(Some(1u32), Some(2u32)).is_absent());
    }
}
