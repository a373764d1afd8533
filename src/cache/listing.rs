//! Listing Cache Module
//!
//! Decides which key a rendered listing lives under and for how long. The
//! bytes themselves sit in the shared [`CacheStore`].

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::listing::params::ListingParams;

/// Namespace every listing key starts with.
pub const LISTING_CACHE_PREFIX: &str = "book_listing_";

/// Lifetime of a cached listing, in seconds.
pub const LISTING_CACHE_TTL: u64 = 3600;

/// Derives the cache key for a canonical parameter tuple.
///
/// The tuple is serialized in field order and hashed, so equal tuples always
/// share a key and every page of every filter combination gets its own.
pub fn listing_cache_key(params: &ListingParams) -> String {
    let material = serde_json::to_vec(params).unwrap_or_default();
    let digest = Sha256::digest(&material);
    format!("{}{}", LISTING_CACHE_PREFIX, hex::encode(digest))
}

// == Listing Cache ==
#[derive(Debug, Clone)]
pub struct ListingCache {
    store: Arc<RwLock<CacheStore>>,
}

impl ListingCache {
    pub fn new(store: Arc<RwLock<CacheStore>>) -> Self {
        Self { store }
    }

    /// The underlying transient store, shared with the cleanup task.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        Arc::clone(&self.store)
    }

    /// Cached markup for `params`, if a live entry exists.
    pub async fn get(&self, params: &ListingParams) -> Option<String> {
        let key = listing_cache_key(params);
        let hit = self.store.write().await.get(&key);
        debug!(key = %key, hit = hit.is_some(), "listing cache lookup");
        hit
    }

    /// Stores freshly rendered markup for `params`.
    ///
    /// A value the store refuses is logged and dropped; the caller still has
    /// the markup it rendered.
    pub async fn set(&self, params: &ListingParams, markup: String) {
        let key = listing_cache_key(params);
        let result = self
            .store
            .write()
            .await
            .set(key.clone(), markup, LISTING_CACHE_TTL);
        if let Err(err) = result {
            warn!(key = %key, error = %err, "listing not cached");
        }
    }

    /// Drops the cached listing for `params`.
    pub async fn delete(&self, params: &ListingParams) -> bool {
        self.store.write().await.delete(&listing_cache_key(params))
    }

    /// Drops every cached listing, returning how many were removed.
    pub async fn clear_all(&self) -> usize {
        self.store.write().await.clear_prefix(LISTING_CACHE_PREFIX)
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats(LISTING_CACHE_PREFIX)
    }
}
