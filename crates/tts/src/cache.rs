//! Eviction-bounded audio cache
//!
//! In-memory store from cache key to synthesized audio, bounded by entry
//! count with least-used eviction on insert.
//!
//! Expiry is lazy: there is no background sweeper, the `get` that
//! observes a stale entry removes it. The store lives exactly as long as
//! the process; nothing is persisted.

use bytes::Bytes;
use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::key::CacheKey;

/// One cached audio blob
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Bytes,
    created_at: Instant,
    ttl: Duration,
    hit_count: u64,
}

/// Read-only snapshot of the cache, for diagnostics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub total_hits: u64,
    pub entries: Vec<EntrySummary>,
}

/// Per-entry stats line
#[derive(Debug, Clone)]
pub struct EntrySummary {
    /// First 8 hex chars of the key
    pub key_prefix: String,
    pub hit_count: u64,
    pub age: Duration,
    pub bytes: usize,
}

/// Thread-safe audio cache with least-used eviction.
///
/// Backed by a sharded map: operations on different keys never block
/// each other, and hit-count updates are atomic per key.
pub struct AudioCache {
    entries: DashMap<CacheKey, CacheEntry>,
    max_entries: usize,
}

impl AudioCache {
    /// Create a cache holding at most `max_entries` blobs.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(max_entries),
            max_entries,
        }
    }

    /// Look up a key. A fresh entry gets its hit count bumped and its
    /// data returned; a stale entry is removed and reported absent.
    /// This is the only place hit counts change.
    pub fn get(&self, key: &CacheKey) -> Option<Bytes> {
        let expired = {
            let mut entry = self.entries.get_mut(key)?;
            if entry.created_at.elapsed() <= entry.ttl {
                entry.hit_count += 1;
                return Some(entry.data.clone());
            }
            true
        };

        if expired {
            self.entries.remove(key);
            tracing::debug!(key = key.prefix(), "expired cache entry evicted on read");
        }
        None
    }

    /// Insert or overwrite an entry. New entries start at hit count 0.
    ///
    /// Inserting a new key at capacity first evicts the entry with the
    /// globally lowest hit count (ties: oldest, then key order).
    /// Overwriting an existing key never evicts. A put followed by a
    /// get of the same key within the TTL always returns the bytes.
    pub fn put(&self, key: CacheKey, data: Bytes, ttl: Duration) {
        if !self.entries.contains_key(&key) {
            // Racing inserts can overshoot the bound between the length
            // check and the insert; looping drains any backlog so the
            // next put restores it.
            while self.entries.len() >= self.max_entries {
                if !self.evict_least_used() {
                    break;
                }
            }
        }

        self.entries.insert(
            key,
            CacheEntry {
                data,
                created_at: Instant::now(),
                ttl,
                hit_count: 0,
            },
        );
    }

    /// Remove the entry with the lowest hit count. Reports whether an
    /// entry was actually removed.
    fn evict_least_used(&self) -> bool {
        let victim = self
            .entries
            .iter()
            .map(|e| (e.value().hit_count, e.value().created_at, e.key().clone()))
            .min_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)))
            .map(|(_, _, key)| key);

        match victim {
            Some(key) => {
                self.entries.remove(&key);
                tracing::debug!(key = key.prefix(), "least-used cache entry evicted");
                true
            }
            None => false,
        }
    }

    /// Snapshot current cache contents. No side effects.
    pub fn stats(&self) -> CacheStats {
        let mut total_hits = 0;
        let mut entries = Vec::with_capacity(self.entries.len());

        for e in self.entries.iter() {
            total_hits += e.hit_count;
            entries.push(EntrySummary {
                key_prefix: e.key().prefix().to_string(),
                hit_count: e.hit_count,
                age: e.created_at.elapsed(),
                bytes: e.data.len(),
            });
        }

        CacheStats {
            size: entries.len(),
            max_size: self.max_entries,
            total_hits,
            entries,
        }
    }

    /// Drop every entry. Cannot fail.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }
}
