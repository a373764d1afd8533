//! Cache Statistics Module
//!
//! Counters for the transient store: lookups, evictions and stored volume.

use serde::Serialize;

// == Cache Stats ==
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a live entry
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries dropped to stay within capacity
    pub evictions: u64,
    /// Entries currently stored
    pub count: usize,
    /// Total bytes of stored markup
    pub size: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// hits / (hits + misses), 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Overwrites the volume counters from the store's current contents.
    pub fn set_volume(&mut self, count: usize, size: usize) {
        self.count = count;
        self.size = size;
    }

    /// Human readable size, e.g. `"1.5 KB"`.
    pub fn size_human(&self) -> String {
        const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
        let mut value = self.size as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{} B", self.size)
        } else {
            format!("{:.1} {}", value, UNITS[unit])
        }
    }
}
