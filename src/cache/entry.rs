//! Cache Entry Module
//!
//! A single stored listing with its write time and expiry.

// == Cache Entry ==
/// One rendered listing held by the transient store.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Rendered markup, returned verbatim on a hit
    pub value: String,
    /// Write timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Expiration timestamp (Unix milliseconds), None = kept until evicted
    pub expires_at: Option<i64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry written now, expiring `ttl_seconds` later.
    ///
    /// A TTL of zero means the entry never expires on its own, matching how
    /// transients with no expiration behave.
    pub fn new(value: String, ttl_seconds: u64) -> Self {
        Self::written_at(value, ttl_seconds, current_timestamp_ms())
    }

    /// Creates an entry with an explicit write time.
    pub fn written_at(value: String, ttl_seconds: u64, now_ms: i64) -> Self {
        let expires_at = (ttl_seconds > 0).then(|| now_ms + (ttl_seconds as i64) * 1000);

        Self {
            value,
            created_at: now_ms,
            expires_at,
        }
    }

    // == Expiry ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Expiry check against a caller-supplied clock.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        matches!(self.expires_at, Some(expires) if now_ms >= expires)
    }

    /// Remaining lifetime in whole seconds, `Some(0)` once expired.
    pub fn ttl_remaining(&self) -> Option<u64> {
        let now = current_timestamp_ms();
        self.expires_at
            .map(|expires| ((expires - now).max(0) / 1000) as u64)
    }

    /// Size of the stored value in bytes, used for cache statistics.
    pub fn size_bytes(&self) -> usize {
        self.value.len()
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_with_ttl() {
        let entry = CacheEntry::written_at("<div></div>".to_string(), 3600, 1_000);

        assert_eq!(entry.created_at, 1_000);
        assert_eq!(entry.expires_at, Some(3_601_000));
        assert!(!entry.is_expired_at(3_600_999));
        assert!(entry.is_expired_at(3_601_000));
    }

    #[test]
    fn test_entry_without_ttl_never_expires() {
        let entry = CacheEntry::written_at("markup".to_string(), 0, 1_000);

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(i64::MAX));
        assert!(entry.ttl_remaining().is_none());
    }

    #[test]
    fn test_fresh_entry_is_not_expired() {
        let entry = CacheEntry::new("markup".to_string(), 60);

        assert!(!entry.is_expired());
        let remaining = entry.ttl_remaining().unwrap();
        assert!((59..=60).contains(&remaining));
    }

    #[test]
    fn test_expired_entry_reports_zero_remaining() {
        let now = current_timestamp_ms();
        let entry = CacheEntry::written_at("markup".to_string(), 1, now - 5_000);

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Some(0));
    }

    #[test]
    fn test_size_bytes() {
        let entry = CacheEntry::new("héllo".to_string(), 10);
        assert_eq!(entry.size_bytes(), 6);
    }
}
