//! Time-aware bounded cache.
//!
//! [`TimedBoundedCache`] maps keys to values under two limits at once:
//!
//! - **Capacity**: at most `capacity` entries. Inserting beyond it drops
//!   expired entries first, then evicts the least-recently-used ones.
//! - **TTU (time-to-use)**: every entry expires `ttu` after it was *set*.
//!   Reads refresh recency for the capacity policy but never extend expiry.
//!
//! Expiry is lazy: an expired entry may stay physically present until a
//! lookup finds it, an insert needs its slot, or
//! [`purge_expired`](TimedBoundedCache::purge_expired) runs. It is never
//! returned.
//!
//! Recency order is kept by an unbounded [`lru::LruCache`]; the capacity
//! bound is enforced here so that a capacity of zero stays a pass-through
//! and evicted keys can be reported.
//!
//! Time is read from `tokio::time::Instant`, so tests can pause and advance
//! the clock.

use lru::LruCache;
use std::fmt::Display;
use std::hash::Hash;
use std::time::Duration;
use tokio::time::Instant;

struct CacheEntry<V> {
    value: V,
    /// `None` when `now + ttu` overflows, i.e. effectively never.
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// Fixed-capacity, per-entry-expiring key → value cache.
///
/// Not internally synchronized: wrap it in a mutex when shared (the
/// [`CacheRegistry`](crate::registry::CacheRegistry) does).
///
/// # Example
///
/// ```
/// use census_kit::cache::TimedBoundedCache;
/// use std::time::Duration;
///
/// let mut cache = TimedBoundedCache::new(2, Duration::from_secs(1000));
/// cache.set("a", 1);
/// cache.set("b", 2);
/// cache.set("c", 3);
///
/// assert_eq!(cache.get(&"a"), None);
/// assert_eq!(cache.get(&"b"), Some(2));
/// assert_eq!(cache.get(&"c"), Some(3));
/// ```
pub struct TimedBoundedCache<K: Hash + Eq, V> {
    entries: LruCache<K, CacheEntry<V>>,
    capacity: usize,
    ttu: Duration,
}

impl<K, V> TimedBoundedCache<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Clone,
{
    /// Create a cache holding at most `capacity` entries, each living `ttu`.
    ///
    /// A capacity of zero turns the cache into a pass-through; a zero TTU
    /// makes every entry expire on its next lookup.
    pub fn new(capacity: usize, ttu: Duration) -> Self {
        TimedBoundedCache {
            entries: LruCache::unbounded(),
            capacity,
            ttu,
        }
    }

    /// Look up a live entry.
    ///
    /// A hit becomes the most-recently-used entry. An expired entry is removed
    /// and reported as absent.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let now = Instant::now();
        if self.entries.peek(key)?.is_expired(now) {
            self.entries.pop(key);
            debug!("✓ Cache GET {} -> EXPIRED", key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or replace an entry, stamping expiry as `now + ttu`.
    ///
    /// Returns the keys dropped to restore the capacity bound: expired
    /// entries first, then least-recently-used ones. With a capacity of zero
    /// that includes `key` itself.
    pub fn set(&mut self, key: K, value: V) -> Vec<K> {
        let now = Instant::now();
        let entry = CacheEntry {
            value,
            expires_at: now.checked_add(self.ttu),
        };
        self.entries.put(key, entry);

        if self.entries.len() <= self.capacity {
            return Vec::new();
        }

        let mut evicted = self.drain_expired(now);
        while self.entries.len() > self.capacity {
            let Some((key, _)) = self.entries.pop_lru() else {
                break;
            };
            debug!("✓ Cache EVICT {} (capacity {})", key, self.capacity);
            evicted.push(key);
        }
        evicted
    }

    /// Drop an entry, returning its value if it was present (expired or not).
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.pop(key).map(|entry| entry.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether a live entry exists. Does not touch recency.
    pub fn contains(&self, key: &K) -> bool {
        let now = Instant::now();
        self.entries
            .peek(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Remove every expired entry, returning how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let purged = self.drain_expired(Instant::now()).len();
        if purged > 0 {
            debug!("✓ Cache PURGE {} expired entries", purged);
        }
        purged
    }

    /// Entries physically held, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttu(&self) -> Duration {
        self.ttu
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        CacheStats {
            total_entries: self.entries.len(),
            expired_entries: self
                .entries
                .iter()
                .filter(|(_, entry)| entry.is_expired(now))
                .count(),
            capacity: self.capacity,
        }
    }

    fn drain_expired(&mut self, now: Instant) -> Vec<K> {
        let expired: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            self.entries.pop(key);
        }
        expired
    }
}

/// Cache statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Entries that a lookup would still return.
    pub fn live_entries(&self) -> usize {
        self.total_entries - self.expired_entries
    }
}
