//! Expired listing sweep
//!
//! Background task that periodically drops cached listings past their TTL.
//! Reads already skip expired entries; the sweep only reclaims their memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that sweeps expired entries every
/// `cleanup_interval_secs` seconds (at least one).
///
/// The returned handle is aborted during graceful shutdown.
pub fn spawn_cleanup_task(
    cache: Arc<RwLock<CacheStore>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let period = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(interval_secs = period.as_secs(), "starting expired listing sweep");

        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.cleanup_expired()
            };

            if removed > 0 {
                info!(removed, "swept expired listings");
            } else {
                debug!("no expired listings to sweep");
            }
        }
    })
}
