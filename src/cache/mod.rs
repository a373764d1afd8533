//! Cache Module
//!
//! In-memory transient storage with TTL expiry and LRU bounding, and the
//! listing cache built on top of it.

mod entry;
mod listing;
mod lru;
mod stats;
mod store;

pub use entry::{current_timestamp_ms, CacheEntry};
pub use listing::{listing_cache_key, ListingCache, LISTING_CACHE_PREFIX, LISTING_CACHE_TTL};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
