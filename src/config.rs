//! Configuration Module
//!
//! Loads service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::listing::render::DEFAULT_DATE_FORMAT;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of cached listings held at once
    pub max_cache_entries: usize,
    /// Interval in seconds between expired-listing sweeps
    pub cleanup_interval: u64,
    /// Key for anti-forgery tokens; a random one is generated when unset
    pub nonce_secret: Option<String>,
    /// Seconds an anti-forgery token stays valid at most
    pub nonce_lifetime: u64,
    /// chrono strftime pattern for publish dates
    pub date_format: String,
    /// Route of the listing page, also the filter form's target
    pub listing_path: String,
    /// JSON file of books loaded at startup
    pub books_seed_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MAX_CACHE_ENTRIES` - Cached listing capacity (default: 1000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    /// - `NONCE_SECRET` - Token signing key (default: random per process)
    /// - `NONCE_LIFETIME` - Token lifetime in seconds (default: 86400)
    /// - `DATE_FORMAT` - Publish date format (default: `%B %-d, %Y`)
    /// - `LISTING_PATH` - Listing page route (default: `/books`)
    /// - `BOOKS_SEED_PATH` - Optional JSON seed file
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT", defaults.server_port),
            max_cache_entries: parse_var("MAX_CACHE_ENTRIES", defaults.max_cache_entries),
            cleanup_interval: parse_var("CLEANUP_INTERVAL", defaults.cleanup_interval),
            nonce_secret: non_empty_var("NONCE_SECRET"),
            nonce_lifetime: parse_var("NONCE_LIFETIME", defaults.nonce_lifetime),
            date_format: non_empty_var("DATE_FORMAT").unwrap_or(defaults.date_format),
            listing_path: non_empty_var("LISTING_PATH")
                .map(|path| normalize_path(&path))
                .unwrap_or(defaults.listing_path),
            books_seed_path: non_empty_var("BOOKS_SEED_PATH").map(PathBuf::from),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            max_cache_entries: 1000,
            cleanup_interval: 60,
            nonce_secret: None,
            nonce_lifetime: 86_400,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            listing_path: "/books".to_string(),
            books_seed_path: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Leading slash, no trailing slash.
fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.max_cache_entries, 1000);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.nonce_lifetime, 86_400);
        assert_eq!(config.date_format, "%B %-d, %Y");
        assert_eq!(config.listing_path, "/books");
        assert!(config.nonce_secret.is_none());
        assert!(config.books_seed_path.is_none());
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("books"), "/books");
        assert_eq!(normalize_path("/library/"), "/library");
        assert_eq!(normalize_path(" /shelf "), "/shelf");
    }

    #[test]
    fn test_parse_var_falls_back_on_garbage() {
        env::set_var("BOOK_LISTING_TEST_PORT", "not-a-port");
        assert_eq!(parse_var("BOOK_LISTING_TEST_PORT", 3000u16), 3000);
        env::set_var("BOOK_LISTING_TEST_PORT", " 8080 ");
        assert_eq!(parse_var("BOOK_LISTING_TEST_PORT", 3000u16), 8080);
        env::remove_var("BOOK_LISTING_TEST_PORT");
    }
}
