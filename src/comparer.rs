/// Pluggable value-equality strategy.
///
/// Engines use the comparer to detect true no-op updates: when
/// `insert_or_update` hits an existing entry and the stored value compares
/// equal to the new one, the engine only refreshes the entry's recency (or
/// `last_used` stamp in the sharded engine) instead of overwriting the value.
///
/// The comparer is a capability passed at construction, not a subtype
/// relationship: any `Fn(&V, &V) -> bool` closure works, and
/// [`DefaultComparer`] provides structural equality via [`PartialEq`].
///
/// # Examples
///
/// ```
/// use tricache::ValueComparer;
///
/// // Case-insensitive equality for string values.
/// let comparer = |a: &String, b: &String| a.eq_ignore_ascii_case(b);
/// assert!(comparer.equals(&"Value".to_string(), &"value".to_string()));
/// ```
pub trait ValueComparer<V>: Send + Sync {
    /// Returns `true` if the two values should be considered equal.
    fn equals(&self, a: &V, b: &V) -> bool;
}

impl<V, F> ValueComparer<V> for F
where
    F: Fn(&V, &V) -> bool + Send + Sync,
{
    fn equals(&self, a: &V, b: &V) -> bool {
        self(a, b)
    }
}

/// Structural equality comparer, the default for every engine.
///
/// # Examples
///
/// ```
/// use tricache::{DefaultComparer, ValueComparer};
///
/// assert!(DefaultComparer.equals(&1, &1));
/// assert!(!DefaultComparer.equals(&"a", &"b"));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultComparer;

impl<V: PartialEq> ValueComparer<V> for DefaultComparer {
    fn equals(&self, a: &V, b: &V) -> bool {
        a == b
    }
}
