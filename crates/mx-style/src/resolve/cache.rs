//! Resolved-declaration cache.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::rules::DeclarationTable;

/// Counters describing cache effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found no entry or a stale one.
    pub misses: u64,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
}

#[derive(Debug)]
struct CacheEntry {
    /// The style age the entry was computed at.
    age: u64,
    declarations: Arc<DeclarationTable>,
}

/// Matching results keyed by style string.
///
/// Entries are evicted first in, first out. An entry computed at an older
/// style age is stale: looking it up removes it and reports a miss.
#[derive(Debug, Default)]
pub struct StyleCache {
    entries: HashMap<Arc<str>, CacheEntry>,
    /// Newest at the front.
    queue: VecDeque<Arc<str>>,
    stats: CacheStats,
}

impl StyleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the declarations cached for `key` at style age `age`.
    pub fn get(&mut self, key: &str, age: u64) -> Option<Arc<DeclarationTable>> {
        match self.entries.get(key) {
            Some(entry) if entry.age == age => {
                self.stats.hits += 1;
                return Some(Arc::clone(&entry.declarations));
            }
            Some(_) => self.remove(key),
            None => {}
        }

        self.stats.misses += 1;
        None
    }

    /// Add an entry at the head of the eviction queue.
    pub fn insert(&mut self, key: &str, age: u64, declarations: Arc<DeclarationTable>) {
        self.remove(key);

        let key: Arc<str> = Arc::from(key);
        self.entries.insert(Arc::clone(&key), CacheEntry { age, declarations });
        self.queue.push_front(key);
    }

    /// Evict the oldest entries until at most `capacity` remain.
    ///
    /// Returns the number of entries evicted.
    pub fn shrink_to(&mut self, capacity: usize) -> usize {
        let mut evicted = 0;
        while self.queue.len() > capacity
            && let Some(key) = self.queue.pop_back()
        {
            self.entries.remove(&key);
            evicted += 1;
        }

        self.stats.evictions += evicted as u64;
        evicted
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.queue.retain(|k| &**k != key);
        }
    }

    /// Drop every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
