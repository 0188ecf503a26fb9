use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Time source for cache freshness decisions.
///
/// Injected so tests can drive expiry deterministically instead of
/// sleeping through real TTLs.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Wall-clock time. The default for production stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Cache entry with its storage timestamp.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub data: T,
    pub stored_at: SystemTime,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, stored_at: SystemTime) -> Self {
        Self { data, stored_at }
    }

    /// An entry is fresh while its age is strictly below the TTL.
    pub fn is_fresh(&self, ttl: Duration, now: SystemTime) -> bool {
        now < self.stored_at + ttl
    }
}

/// Cache statistics for monitoring and tests.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub total_entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// In-memory TTL cache for upstream response payloads.
///
/// Entries are replaced wholesale on `put`; a stale entry is skipped on
/// read but kept in the map until the next refresh overwrites it. There
/// is no eviction and no size bound, so the store lives and grows with
/// the process. Two concurrent misses on one key may both fetch and
/// both write; the last write wins, which is harmless for idempotent
/// upstream reads.
#[derive(Clone)]
pub struct CacheStore<T> {
    entries: Arc<RwLock<HashMap<String, CacheEntry<T>>>>,
    stats: Arc<RwLock<CacheStats>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> CacheStore<T> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(CacheStats::default())),
            ttl,
            clock,
        }
    }

    /// Get the payload for `key` if a fresh entry exists.
    pub fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read();
        let mut stats = self.stats.write();

        match entries.get(key) {
            Some(entry) if entry.is_fresh(self.ttl, self.clock.now()) => {
                stats.hits += 1;
                Some(entry.data.clone())
            }
            Some(_) => {
                stats.expirations += 1;
                stats.misses += 1;
                None
            }
            None => {
                stats.misses += 1;
                None
            }
        }
    }

    /// Store `value` under `key`, overwriting any prior entry.
    pub fn put(&self, key: String, value: T) {
        let entry = CacheEntry::new(value, self.clock.now());
        let mut entries = self.entries.write();
        let mut stats = self.stats.write();

        entries.insert(key, entry);
        stats.total_entries = entries.len();
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        let mut stats = self.stats.write();

        entries.clear();
        stats.total_entries = 0;
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.read().clone()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Derive the cache key for an upstream request.
///
/// Parameters are sorted by name before hashing, so two logically
/// identical requests produce the same key regardless of the order the
/// caller assembled them in. Field boundaries are marked with control
/// bytes to keep adjacent names and values unambiguous.
pub fn cache_key(endpoint: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    let mut hasher = blake3::Hasher::new();
    hasher.update(endpoint.as_bytes());
    hasher.update(&[0x1e]);
    for (name, value) in sorted {
        hasher.update(name.as_bytes());
        hasher.update(&[0x1f]);
        hasher.update(value.as_bytes());
        hasher.update(&[0x1e]);
    }

    format!("{}:{}", endpoint, hasher.finalize().to_hex())
}
