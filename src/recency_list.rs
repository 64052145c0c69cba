//! Arena-backed doubly linked recency chain used by the LRU engines.
//!
//! Nodes live in a slab (`Vec` with an internal free list) and are addressed
//! by stable [`NodeId`] handles, so "move to front" and "remove from tail"
//! are true O(1) index operations rather than list searches. The chain is
//! ordered most-recently-used (front) to least-recently-used (back).

/// Stable handle to a node in a [`RecencyList`].
///
/// Handles are slab indices; they stay valid until the node is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

enum Slot<K, V> {
    Occupied(Node<K, V>),
    Vacant { next_free: Option<usize> },
}

/// Doubly linked list of `{ key, value }` entries with O(1) reordering.
pub(crate) struct RecencyList<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Option<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: None,
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn node(&self, id: NodeId) -> Option<&Node<K, V>> {
        match self.slots.get(id.0) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V>> {
        match self.slots.get_mut(id.0) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// Returns the key stored at `id`, if the node is live.
    #[cfg(test)]
    pub(crate) fn key(&self, id: NodeId) -> Option<&K> {
        self.node(id).map(|node| &node.key)
    }

    /// Returns the value stored at `id`, if the node is live.
    pub(crate) fn value(&self, id: NodeId) -> Option<&V> {
        self.node(id).map(|node| &node.value)
    }

    /// Overwrites the value stored at `id`; returns `false` if `id` is stale.
    pub(crate) fn set_value(&mut self, id: NodeId, value: V) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.value = value;
                true
            }
            None => false,
        }
    }

    /// Handle of the least-recently-used node.
    #[cfg(test)]
    pub(crate) fn back_id(&self) -> Option<NodeId> {
        self.tail
    }

    /// Handle of the most-recently-used node.
    #[cfg(test)]
    pub(crate) fn front_id(&self) -> Option<NodeId> {
        self.head
    }

    /// Inserts a new entry at the front (most recently used) and returns its
    /// handle.
    pub(crate) fn push_front(&mut self, key: K, value: V) -> NodeId {
        let node = Node {
            key,
            value,
            prev: None,
            next: self.head,
        };
        let id = match self.free {
            Some(index) => {
                let next_free = match self.slots[index] {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => unreachable!("free list points at occupied slot"),
                };
                self.free = next_free;
                self.slots[index] = Slot::Occupied(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                NodeId(self.slots.len() - 1)
            }
        };
        if let Some(old_head) = self.head {
            if let Some(head_node) = self.node_mut(old_head) {
                head_node.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
        self.len += 1;
        id
    }

    /// Moves a live node to the front; returns `false` if `id` is stale.
    pub(crate) fn move_to_front(&mut self, id: NodeId) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }
        self.detach(id);
        let old_head = self.head;
        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        if let Some(old_head) = old_head {
            if let Some(head_node) = self.node_mut(old_head) {
                head_node.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
        true
    }

    /// Removes and returns the least-recently-used entry.
    pub(crate) fn pop_back(&mut self) -> Option<(K, V)> {
        let id = self.tail?;
        self.remove(id)
    }

    /// Removes the node `id` and returns its entry.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<(K, V)> {
        self.node(id)?;
        self.detach(id);
        let slot = std::mem::replace(&mut self.slots[id.0], Slot::Vacant { next_free: self.free });
        self.free = Some(id.0);
        self.len -= 1;
        match slot {
            Slot::Occupied(node) => Some((node.key, node.value)),
            Slot::Vacant { .. } => None,
        }
    }

    /// Unlinks `id` from the chain without freeing its slot.
    fn detach(&mut self, id: NodeId) {
        let (prev, next) = match self.node(id) {
            Some(node) => (node.prev, node.next),
            None => return,
        };
        match prev {
            Some(prev_id) => {
                if let Some(prev_node) = self.node_mut(prev_id) {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next_id) => {
                if let Some(next_node) = self.node_mut(next_id) {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = None;
        }
    }

    /// Keys from front (MRU) to back (LRU). Test introspection only.
    #[cfg(test)]
    pub(crate) fn keys_front_to_back(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len);
        let mut current = self.head;
        while let Some(id) = current {
            if let Some(node) = self.node(id) {
                keys.push(&node.key);
                current = node.next;
            } else {
                break;
            }
        }
        keys
    }

    #[cfg(test)]
    pub(crate) fn debug_validate_invariants(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len, 0);
            return;
        }
        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(id) = current {
            let node = self.node(id).expect("chain points at vacant slot");
            assert_eq!(node.prev, prev);
            if node.next.is_none() {
                assert_eq!(self.tail, Some(id));
            }
            prev = Some(id);
            current = node.next;
            count += 1;
            assert!(count <= self.len);
        }
        assert_eq!(count, self.len);
    }
}
