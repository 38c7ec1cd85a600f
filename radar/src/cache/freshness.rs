use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Thread-safe TTL cache with first-in-first-out eviction.
///
/// Backed by an `LruCache` whose recency order is only ever touched on
/// insertion: reads use `peek`, so the least-recent slot is always the
/// oldest insertion. Overwriting a key counts as a fresh insertion.
///
/// Clones share the same underlying store.
#[derive(Clone)]
pub struct FreshnessCache<V> {
    name: &'static str,
    entries: Arc<Mutex<LruCache<String, CacheEntry<V>>>>,
    default_ttl: Duration,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub name: String,
    pub size: usize,
    pub max_size: usize,
    pub default_ttl_secs: u64,
    pub hits: u64,
    pub misses: u64,
}

impl<V: Clone> FreshnessCache<V> {
    /// A `max_size` of zero is treated as one.
    pub fn new(name: &'static str, default_ttl: Duration, max_size: usize) -> Self {
        let capacity = NonZeroUsize::new(max_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            name,
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
            default_ttl,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, CacheEntry<V>>> {
        // Entries are plain values, so a panic mid-operation cannot leave
        // one half-written.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the value if present and unexpired. An expired entry is
    /// removed and reported as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.lock();

        let fresh = match entries.peek(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                entries.pop(key);
                None
            }
            None => None,
        };
        drop(entries);

        match fresh {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or overwrite `key`. At capacity, inserting a new key evicts
    /// the oldest insertion first.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl.unwrap_or(self.default_ttl),
        };
        self.lock().put(key.into(), entry);
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn clean_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();

        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            entries.pop(key);
        }

        expired.len()
    }

    /// Remove one entry, or everything when `key` is `None`.
    pub fn clear(&self, key: Option<&str>) {
        let mut entries = self.lock();
        match key {
            Some(key) => {
                entries.pop(key);
            }
            None => entries.clear(),
        }
    }

    /// Remove every entry whose key starts with `prefix`.
    pub fn clear_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.lock();
        let matching: Vec<String> = entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &matching {
            entries.pop(key);
        }

        matching.len()
    }

    /// Entries currently held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.lock();
        CacheStats {
            name: self.name.to_string(),
            size: entries.len(),
            max_size: entries.cap().get(),
            default_ttl_secs: self.default_ttl.as_secs(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
