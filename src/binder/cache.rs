//! Small LRU keyed by item identity.
//!
//! Every touch appends `(key, stamp)` to a queue and records the stamp on the entry; eviction pops
//! from the front and skips queue records whose stamp is no longer the entry's current one.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

#[derive(Debug)]
pub struct LruCache<K, V> {
    cap: usize,
    next_stamp: u64,
    entries: HashMap<K, (V, u64)>,
    order: VecDeque<(K, u64)>,
}

impl<K: Clone + Eq + Hash, V> LruCache<K, V> {
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            next_stamp: 0,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Look up and mark as recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.entries.contains_key(key) {
            return None;
        }
        let stamp = self.alloc_stamp();
        self.order.push_back((key.clone(), stamp));
        let entry = self.entries.get_mut(key)?;
        entry.1 = stamp;
        self.compact();
        self.entries.get(key).map(|(v, _)| v)
    }

    /// Look up without touching recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|(v, _)| v)
    }

    pub fn insert(&mut self, key: K, value: V) {
        let stamp = self.alloc_stamp();
        self.order.push_back((key.clone(), stamp));
        self.entries.insert(key, (value, stamp));
        self.evict_to_fit();
        self.compact();
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        // Queue records for the key are skipped later since the entry is gone.
        self.entries.remove(key).map(|(v, _)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn alloc_stamp(&mut self) -> u64 {
        let s = self.next_stamp;
        self.next_stamp += 1;
        s
    }

    fn evict_to_fit(&mut self) {
        while self.entries.len() > self.cap {
            let Some((key, stamp)) = self.order.pop_front() else {
                break;
            };
            if self.entries.get(&key).is_some_and(|(_, s)| *s == stamp) {
                self.entries.remove(&key);
            }
        }
    }

    /// Drop outdated queue records once the queue grows well past the entry count.
    fn compact(&mut self) {
        if self.order.len() <= self.cap.saturating_mul(8).max(64) {
            return;
        }
        let entries = &self.entries;
        self.order
            .retain(|(k, s)| entries.get(k).is_some_and(|(_, cur)| cur == s));
    }
}
