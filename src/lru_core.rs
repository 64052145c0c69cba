//! Shared state and algorithm for the two LRU engines.
//!
//! Both engines guard the same structure, a hash index plus a recency chain,
//! with different mutual-exclusion primitives. The core itself is not
//! synchronized; callers hold the owning lock across every call.

use std::collections::HashMap;
use std::sync::Arc;

use crate::recency_list::{NodeId, RecencyList};
use crate::{CacheKey, ValueComparer};

/// Hash index + recency chain + capacity limit.
///
/// Invariant (outside a lock-held mutation window): every key in the index
/// has exactly one node in the chain and vice versa, so
/// `index.len() == chain.len()`.
pub(crate) struct LruCore<K, V> {
    index: HashMap<K, NodeId>,
    chain: RecencyList<K, V>,
    limit: usize,
    comparer: Arc<dyn ValueComparer<V>>,
}

impl<K: CacheKey + Clone, V: Clone> LruCore<K, V> {
    pub(crate) fn new(limit: usize, comparer: Arc<dyn ValueComparer<V>>) -> Self {
        Self {
            index: HashMap::new(),
            chain: RecencyList::new(),
            limit,
            comparer,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    /// O(1) index probe.
    pub(crate) fn probe(&self, key: &K) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// Compares the stored value at `id` against `candidate` using the
    /// configured equality policy.
    pub(crate) fn is_equal_value(&self, id: NodeId, candidate: &V) -> bool {
        match self.chain.value(id) {
            Some(stored) => self.comparer.equals(stored, candidate),
            None => false,
        }
    }

    /// Marks the entry as most recently used without touching its value.
    pub(crate) fn touch(&mut self, id: NodeId) {
        self.chain.move_to_front(id);
    }

    /// Overwrites the stored value and marks the entry most recently used.
    pub(crate) fn overwrite(&mut self, id: NodeId, value: V) {
        self.chain.set_value(id, value);
        self.chain.move_to_front(id);
    }

    pub(crate) fn value_clone(&self, id: NodeId) -> Option<V> {
        self.chain.value(id).cloned()
    }

    /// Inserts a fresh entry at the most-recently-used position, evicting the
    /// least-recently-used entry if the limit was breached.
    ///
    /// Exactly one eviction happens per over-limit insert, so the index never
    /// holds more than `limit + 1` entries even transiently, and never more
    /// than `limit` on return.
    pub(crate) fn insert(&mut self, key: K, value: V) {
        let id = self.chain.push_front(key.clone(), value);
        self.index.insert(key, id);
        if self.index.len() > self.limit {
            if let Some((evicted_key, _)) = self.chain.pop_back() {
                self.index.remove(&evicted_key);
            }
        }
    }
}
