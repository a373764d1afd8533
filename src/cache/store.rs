//! Transient Store Module
//!
//! Process-wide key/value store with per-entry TTL and a capacity bound.
//! It plays the part of the host's transient storage: the listing cache only
//! decides keys and lifetimes, this type keeps the bytes.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, LruTracker, MAX_KEY_LENGTH};
use crate::error::{ListingError, Result};

// == Cache Store ==
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
}

impl CacheStore {
    /// Creates an empty store holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl_seconds` (0 = no expiry).
    ///
    /// Overwrites reset the TTL. A new key on a full store evicts the least
    /// recently used entry first.
    pub fn set(&mut self, key: String, value: String, ttl_seconds: u64) -> Result<()> {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return Err(ListingError::Internal(format!(
                "cache key must be 1..={} bytes",
                MAX_KEY_LENGTH
            )));
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, "evicted least recently used entry");
            }
        }

        self.lru.touch(&key);
        self.entries.insert(key, CacheEntry::new(value, ttl_seconds));
        Ok(())
    }

    // == Get ==
    /// Returns the live value for `key`. Expired entries are dropped and
    /// count as misses.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let now = current_timestamp_ms();
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                self.lru.touch(key);
                Some(value)
            }
            Some(_) => {
                self.entries.remove(key);
                self.lru.remove(key);
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Delete ==
    /// Removes `key`, returning whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
        }
        removed
    }

    /// Remaining lifetime of `key` in seconds, without counting a lookup.
    #[cfg(test)]
    pub(crate) fn ttl_remaining(&self, key: &str) -> Option<u64> {
        self.entries.get(key).and_then(CacheEntry::ttl_remaining)
    }

    // == Clear Prefix ==
    /// Removes every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    pub fn clear_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        self.lru.remove_prefixed(prefix);
        before - self.entries.len()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }
        expired.len()
    }

    // == Stats ==
    /// Snapshot of the counters plus entry count and stored bytes under `prefix`.
    pub fn stats(&self, prefix: &str) -> CacheStats {
        let (count, size) = self
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .fold((0, 0), |(count, size), (_, entry)| {
                (count + 1, size + entry.size_bytes())
            });

        let mut stats = self.stats.clone();
        stats.set_volume(count, size);
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn insert_entry(&mut self, key: &str, entry: CacheEntry) {
        self.lru.touch(key);
        self.entries.insert(key.to_string(), entry);
    }
}
