//! Bounded LRU cache used for preset descriptors and decoded audio
//!
//! Two instances of [`BoundedCache`] back the engine: one keyed by preset
//! document URL, one keyed by audio cache key (content hash, resolved URL,
//! or inline-payload prefix). Eviction is purely size-based; there is no
//! time-based expiry and `clear` on one cache never touches the other.

use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// Capacity-bounded cache with least-recently-used eviction.
///
/// - `get` promotes the key to most-recently-used without changing size
/// - `insert` of an existing key updates the value and promotes
/// - `insert` of a new key at capacity evicts exactly the LRU entry first
///
/// All operations are O(1) amortized.
#[derive(Debug)]
pub struct BoundedCache<K: Hash + Eq, V> {
    entries: LruCache<K, V>,
}

impl<K: Hash + Eq, V> BoundedCache<K, V> {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Look up a key, promoting it to most-recently-used on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert or update a value, promoting the key. Evicts the
    /// least-recently-used entry when a new key arrives at capacity.
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.put(key, value);
    }

    /// Whether the key is present. Does not affect recency.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains(key)
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Drop all entries without changing capacity.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
