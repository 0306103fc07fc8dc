//! LRU (Least Recently Used) cache implementation
//!
//! Index-based doubly-linked list over an arena of slots, plus a hash map from
//! key to slot index. Every operation is O(1) amortized; nothing ever walks
//! the list.

use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;

use crate::error::{Error, Result};

/// Node in the recency list. Slots are addressed by stable `usize` indices
/// instead of pointers, so there are no ownership cycles to break.
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Fixed-capacity LRU cache.
///
/// The head of the recency list is the most recently touched key; the tail is
/// the next eviction victim. `get` counts as a touch, so it takes `&mut self`.
pub struct LruCache<K, V> {
    map: HashMap<K, usize, RandomState>,
    slots: Vec<Option<Node<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free: Vec<usize>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }

        Ok(Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            slots: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free: Vec::new(),
            capacity,
        })
    }

    /// Look up `key`, refreshing its recency on a hit.
    ///
    /// A miss returns `None` and leaves both ordering and occupancy untouched.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.touch(idx);
        self.slots[idx].as_ref().map(|node| &node.value)
    }

    /// Insert or update `key`, making it the most recently used entry.
    ///
    /// Updating an existing key never evicts. Inserting a new key into a full
    /// cache evicts the least recently used entry first; the evicted pair is
    /// returned so callers can observe it.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.map.get(&key) {
            if let Some(node) = self.slots[idx].as_mut() {
                node.value = value;
            }
            self.touch(idx);
            return None;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict_tail()
        } else {
            None
        };

        let idx = self.alloc_slot();
        self.slots[idx] = Some(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.push_front(idx);
        self.map.insert(key, idx);

        evicted
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        self.unlink(idx);
        self.free.push(idx);
        self.slots[idx].take().map(|node| node.value)
    }

    /// Current occupancy, `0 ..= capacity`.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no entries are held.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.map.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    /// Move an already-linked slot to the head of the recency list.
    fn touch(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    /// Link an unlinked slot in at the head.
    fn push_front(&mut self, idx: usize) {
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_idx) = self.head {
            if let Some(head) = self.slots[head_idx].as_mut() {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    /// Detach a slot from the list, fixing up head/tail and neighbours.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = self.slots[prev_idx].as_mut() {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = self.slots[next_idx].as_mut() {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    /// Remove the LRU entry and return it.
    fn evict_tail(&mut self) -> Option<(K, V)> {
        let tail_idx = self.tail?;
        self.unlink(tail_idx);
        self.free.push(tail_idx);
        let node = self.slots[tail_idx].take()?;
        self.map.remove(&node.key);
        Some((node.key, node.value))
    }

    fn alloc_slot(&mut self) -> usize {
        match self.free.pop() {
            Some(idx) => idx,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            LruCache::<u64, &str>::new(0).err(),
            Some(Error::InvalidCapacity(0))
        );
    }

    #[test]
    fn test_get_after_put() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_miss_has_no_side_effects() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");

        assert_eq!(cache.get(&9), None);
        assert_eq!(cache.len(), 2);

        // The miss must not have disturbed recency: 1 is still the LRU entry.
        assert_eq!(cache.put(3, "c"), Some((1, "a")));
    }

    #[test]
    fn test_eviction_order() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        let evicted = cache.put(3, "c");

        assert_eq!(evicted, Some((1, "a")));
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.get(&3), Some(&"c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_get_refreshes_recency() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.get(&1); // 1 becomes MRU, 2 becomes the victim

        assert_eq!(cache.put(3, "c"), Some((2, "b")));
        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&2), None);
    }

    #[test]
    fn test_overwrite_never_evicts() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.put(1, "a2"), None);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), Some(&"a2"));
        assert_eq!(cache.get(&2), Some(&"b"));
    }

    #[test]
    fn test_overwrite_refreshes_recency() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(1, "a2"); // 1 is MRU again, 2 is the victim

        assert_eq!(cache.put(3, "c"), Some((2, "b")));
        assert_eq!(cache.get(&1), Some(&"a2"));
    }

    #[test]
    fn test_repeated_get_is_idempotent_for_ordering() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");
        cache.get(&1);
        cache.get(&1);
        cache.get(&1);

        // 2 is still the LRU entry regardless of how often 1 was read.
        assert_eq!(cache.put(4, "d"), Some((2, "b")));
    }

    #[test]
    fn test_textbook_scenario() {
        // Capacity 3: put 1..3, refresh 1, insert 4, expect 2 evicted.
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "A");
        cache.put(2, "B");
        cache.put(3, "C");
        assert_eq!(cache.get(&1), Some(&"A"));
        assert_eq!(cache.put(4, "D"), Some((2, "B")));

        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&3), Some(&"C"));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_len_tracks_distinct_keys() {
        let mut cache = LruCache::new(10).unwrap();

        for k in 0..5 {
            cache.put(k, k * 10);
        }
        cache.put(3, 99); // duplicate key

        assert_eq!(cache.len(), 5);
    }

    #[test]
    fn test_len_capped_at_capacity() {
        let mut cache = LruCache::new(4).unwrap();

        for k in 0..100 {
            cache.put(k, k);
        }

        assert_eq!(cache.len(), 4);
        // Survivors are exactly the last four inserted.
        for k in 96..100 {
            assert_eq!(cache.get(&k), Some(&k));
        }
        assert_eq!(cache.get(&95), None);
    }

    #[test]
    fn test_capacity_one() {
        let mut cache = LruCache::new(1).unwrap();

        cache.put(1, "a");
        assert_eq!(cache.put(2, "b"), Some((1, "a")));
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");

        assert_eq!(cache.remove(&2), Some("b"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.remove(&2), None);
    }

    #[test]
    fn test_remove_head_and_tail() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");

        assert_eq!(cache.remove(&3), Some("c")); // head
        assert_eq!(cache.remove(&1), Some("a")); // tail
        assert_eq!(cache.len(), 1);

        // List must still be well-formed around the lone survivor.
        cache.put(4, "d");
        cache.put(5, "e");
        assert_eq!(cache.put(6, "f"), Some((2, "b")));
    }

    #[test]
    fn test_slot_reuse_after_eviction() {
        let mut cache = LruCache::new(2).unwrap();

        for k in 0..50 {
            cache.put(k, k);
        }

        // Arena never grows past capacity worth of slots.
        assert_eq!(cache.slots.len(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.clear();

        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);

        cache.put(7, "g");
        assert_eq!(cache.get(&7), Some(&"g"));
    }

    #[test]
    fn test_string_keys() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put("alpha".to_string(), 1);
        cache.put("beta".to_string(), 2);
        let evicted = cache.put("gamma".to_string(), 3);

        assert_eq!(evicted, Some(("alpha".to_string(), 1)));
        assert_eq!(cache.get(&"beta".to_string()), Some(&2));
    }
}
