//! Bounded, time-limited cache of successful builds.
//!
//! Entries are fresh while younger than the TTL. Expired entries are not
//! purged; they read as misses until overwritten or evicted. When an insert
//! pushes the cache over capacity, the oldest *inserted* entry is evicted.
//! Lookups do not refresh an entry's position, so this is FIFO, not LRU.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use indexmap::IndexMap;

use crate::fingerprint::Fingerprint;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Time source for entry freshness.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// The cacheable subset of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedBuild {
    pub bundle_code: String,
    pub warnings: Vec<String>,
    pub bytes: usize,
}

#[derive(Debug)]
struct CacheEntry {
    build: CachedBuild,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct BuildCache {
    entries: IndexMap<Fingerprint, CacheEntry>,
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl BuildCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self::with_clock(ttl, capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: IndexMap::new(),
            ttl,
            capacity: capacity.max(1),
            clock,
        }
    }

    pub fn lookup(&self, key: &Fingerprint) -> Option<&CachedBuild> {
        let entry = self.entries.get(key)?;
        let age = self.clock.now().saturating_duration_since(entry.stored_at);
        (age < self.ttl).then_some(&entry.build)
    }

    /// Insert or overwrite `key`, then evict one entry if over capacity.
    ///
    /// Overwriting keeps the key's original insertion slot.
    pub fn store(&mut self, key: Fingerprint, build: CachedBuild) {
        let entry = CacheEntry {
            build,
            stored_at: self.clock.now(),
        };
        self.entries.insert(key, entry);

        if self.entries.len() > self.capacity {
            if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                tracing::debug!(fingerprint = %evicted, "evicted oldest cache entry");
            }
        }
    }

    /// Drop every entry, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let cleared = self.entries.len();
        self.entries.clear();
        cleared
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &Fingerprint) -> bool {
        self.entries.contains_key(key)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for BuildCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL, DEFAULT_CACHE_CAPACITY)
    }
}
