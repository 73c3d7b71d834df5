//! Time-based cache with TTL (Time To Live) support.
//!
//! This module provides a thread-safe cache that serves entries only within
//! a fixed freshness window, and a `get_or_fetch` operation that collapses
//! the check-then-fetch-then-store sequence into one call.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// A cache entry with a timestamp.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// A thread-safe cache with time-based expiration.
///
/// An entry is fresh iff `now - inserted_at < ttl`. Freshness is the sole
/// eviction criterion: stale entries are not proactively removed, only
/// overwritten by the next successful fetch for the same key (or reclaimed
/// explicitly via [`cleanup_expired`](Self::cleanup_expired)). The cache is
/// thread-safe and can be cloned cheaply (uses Arc internally).
#[derive(Clone)]
pub struct TimedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    cache: Arc<RwLock<HashMap<K, CacheEntry<V>>>>,
    ttl: Duration,
}

impl<K, V> TimedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a new TimedCache with the specified freshness window.
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Insert a value into the cache.
    ///
    /// If a value with the same key already exists, it will be replaced.
    pub fn insert(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            inserted_at: Instant::now(),
        };

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, entry);
        }
    }

    /// Get a value from the cache if it exists and hasn't expired.
    ///
    /// Returns `None` if:
    /// - The key doesn't exist
    /// - The entry has expired (older than TTL)
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();

        if let Ok(cache) = self.cache.read() {
            if let Some(entry) = cache.get(key) {
                if now.duration_since(entry.inserted_at) < self.ttl {
                    return Some(entry.value.clone());
                }
            }
        }

        None
    }

    /// Return the fresh value for `key`, or fetch, store, and return it.
    ///
    /// If a fresh entry exists it is returned without invoking `fetch`.
    /// Otherwise `fetch` is awaited; on success the result is stored under
    /// `key` and returned, on failure the error is propagated and nothing is
    /// written (a stale entry, if any, stays in place for the next attempt —
    /// it is never returned past its freshness window).
    ///
    /// The internal lock is not held across the await, so two overlapping
    /// calls that both miss will both fetch; the entry ends up holding
    /// whichever result was written last.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Remove all expired entries from the cache.
    ///
    /// Never required for correctness (expired entries are ignored by
    /// `get()`), but callers with long-lived processes and unbounded key
    /// spaces can use it to reclaim memory.
    pub fn cleanup_expired(&self) {
        let now = Instant::now();

        if let Ok(mut cache) = self.cache.write() {
            cache.retain(|_, entry| now.duration_since(entry.inserted_at) < self.ttl);
        }
    }

    /// Get the number of entries in the cache (including expired ones).
    pub fn len(&self) -> usize {
        if let Ok(cache) = self.cache.read() {
            cache.len()
        } else {
            0
        }
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the TTL duration for this cache.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<K, V> std::fmt::Debug for TimedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}
