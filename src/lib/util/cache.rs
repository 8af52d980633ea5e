//! LRU cache shared between threads.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use antidote::Mutex;
use lru_cache::LruCache;


/// Snapshot of cache usage counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    /// Entries dropped to make room for new ones.
    pub evictions: usize,
}

impl CacheStats {
    /// Fraction of lookups that found their entry, if there were any lookups.
    pub fn hit_ratio(&self) -> Option<f32> {
        match self.hits + self.misses {
            0 => None,
            total => Some(self.hits as f32 / total as f32),
        }
    }
}


struct Entries<K: Eq + Hash, V> {
    lru: LruCache<K, Arc<V>>,
    stats: CacheStats,
}

/// Cache of loaded resources, handed out as `Arc`s.
pub struct ThreadSafeCache<K: Eq + Hash, V> {
    entries: Mutex<Entries<K, V>>,
}

impl<K: Eq + Hash, V> ThreadSafeCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        ThreadSafeCache{
            entries: Mutex::new(Entries{
                lru: LruCache::new(capacity),
                stats: CacheStats::default(),
            }),
        }
    }

    /// Look up the entry for given key, marking it as most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
        where K: Borrow<Q>, Q: ?Sized + Eq + Hash
    {
        let mut entries = self.entries.lock();
        let found = entries.lru.get_mut(key).map(|v| v.clone());
        match found {
            Some(_) => entries.stats.hits += 1,
            None => entries.stats.misses += 1,
        }
        found
    }

    /// Store a value under given key and return the shared handle to it.
    pub fn put(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        let mut entries = self.entries.lock();
        let replacing = entries.lru.contains_key(&key);
        if !replacing && entries.lru.len() >= entries.lru.capacity() {
            entries.stats.evictions += 1;
        }
        entries.lru.insert(key, value.clone());
        value
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
        where K: Borrow<Q>, Q: ?Sized + Eq + Hash
    {
        self.entries.lock().lru.contains_key(key)
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().lru.capacity()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().lru.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().lru.is_empty()
    }

    /// Drop all the entries. Counters are kept.
    pub fn clear(&self) {
        self.entries.lock().lru.clear()
    }

    pub fn stats(&self) -> CacheStats {
        self.entries.lock().stats
    }
}

impl<K: Eq + Hash, V> fmt::Debug for ThreadSafeCache<K, V> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let mut ds = fmt.debug_struct("ThreadSafeCache");
        if let Ok(entries) = self.entries.try_lock() {
            ds.field("capacity", &entries.lru.capacity());
            ds.field("len", &entries.lru.len());
            ds.field("stats", &entries.stats);
        }
        ds.finish()
    }
}


#[cfg(test)]
mod tests {
    use super::{CacheStats, ThreadSafeCache};

    #[test]
    fn counts_hits_and_misses() {
        let cache = ThreadSafeCache::new(2);
        assert!(cache.get("impact").is_none());
        cache.put("impact".to_owned(), 1);
        assert_eq!(Some(1), cache.get("impact").map(|v| *v));
        assert_eq!(CacheStats{hits: 1, misses: 1, evictions: 0}, cache.stats());
        assert_eq!(Some(0.5), cache.stats().hit_ratio());
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = ThreadSafeCache::new(2);
        cache.put("a".to_owned(), 1);
        cache.put("b".to_owned(), 2);
        cache.get("a");
        cache.put("c".to_owned(), 3);
        assert_eq!(2, cache.len());
        assert!(!cache.contains("b"));
        assert!(cache.contains("a"));
        assert_eq!(1, cache.stats().evictions);

        cache.put("a".to_owned(), 10);
        assert_eq!(1, cache.stats().evictions);
    }

    #[test]
    fn no_lookups_no_ratio() {
        let cache: ThreadSafeCache<String, ()> = ThreadSafeCache::new(1);
        assert_eq!(None, cache.stats().hit_ratio());
    }
}
