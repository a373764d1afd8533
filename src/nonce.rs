//! Anti-forgery tokens for the load-more endpoint.
//!
//! A token is a truncated HMAC-SHA256 over the action name and the current
//! time window. Windows are half the configured lifetime long and the
//! previous window is still accepted, so a token stays valid for between half
//! and the whole lifetime.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use tracing::debug;

use crate::error::{ListingError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Action the listing page signs for its load-more requests.
pub const LOAD_MORE_ACTION: &str = "book_listing_load_more";

/// Message returned for any failed token check.
pub const SECURITY_CHECK_FAILED: &str =
    "Security check failed. Please refresh the page and try again.";

const TOKEN_BYTES: usize = 16;

// == Nonce Issuer ==
#[derive(Clone)]
pub struct NonceIssuer {
    mac: HmacSha256,
    lifetime_secs: u64,
}

impl std::fmt::Debug for NonceIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceIssuer")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl NonceIssuer {
    pub fn new(secret: &[u8], lifetime_secs: u64) -> Result<Self> {
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| ListingError::Internal(format!("nonce secret rejected: {}", e)))?;
        Ok(Self {
            mac,
            lifetime_secs: lifetime_secs.max(2),
        })
    }

    /// Issuer keyed with a fresh random secret; tokens die with the process.
    pub fn random(lifetime_secs: u64) -> Result<Self> {
        let secret: [u8; 32] = rand::thread_rng().gen();
        Self::new(&secret, lifetime_secs)
    }

    /// Token for `action` in the current window.
    pub fn create(&self, action: &str) -> String {
        self.create_at(action, chrono::Utc::now().timestamp())
    }

    pub fn create_at(&self, action: &str, now_secs: i64) -> String {
        let tag = self.sign(action, self.tick(now_secs));
        hex::encode(&tag[..TOKEN_BYTES])
    }

    /// Checks a token for `action` against the current or previous window.
    pub fn verify(&self, action: &str, token: Option<&str>) -> Result<()> {
        self.verify_at(action, token, chrono::Utc::now().timestamp())
    }

    pub fn verify_at(&self, action: &str, token: Option<&str>, now_secs: i64) -> Result<()> {
        let rejected = || ListingError::Authenticity(SECURITY_CHECK_FAILED.to_string());

        let token = token.map(str::trim).filter(|t| !t.is_empty()).ok_or_else(rejected)?;
        let bytes = hex::decode(token).map_err(|_| rejected())?;
        if bytes.len() != TOKEN_BYTES {
            return Err(rejected());
        }

        let tick = self.tick(now_secs);
        let valid = [tick, tick - 1].into_iter().any(|t| {
            let mut mac = self.mac.clone();
            mac.update(&Self::message(action, t));
            mac.verify_truncated_left(&bytes).is_ok()
        });

        if valid {
            Ok(())
        } else {
            debug!(action, "anti-forgery token did not verify");
            Err(rejected())
        }
    }

    fn tick(&self, now_secs: i64) -> i64 {
        let window = (self.lifetime_secs / 2) as i64;
        now_secs.div_euclid(window) + 1
    }

    fn sign(&self, action: &str, tick: i64) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(&Self::message(action, tick));
        mac.finalize().into_bytes().to_vec()
    }

    fn message(action: &str, tick: i64) -> Vec<u8> {
        format!("{}|{}", action, tick).into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 86_400;
    const NOW: i64 = 1_700_000_000;

    fn issuer() -> NonceIssuer {
        NonceIssuer::new(b"test-secret", DAY).unwrap()
    }

    #[test]
    fn test_round_trip_in_same_window() {
        let issuer = issuer();
        let token = issuer.create_at(LOAD_MORE_ACTION, NOW);

        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(issuer.verify_at(LOAD_MORE_ACTION, Some(&token), NOW).is_ok());
    }

    #[test]
    fn test_previous_window_still_valid() {
        let issuer = issuer();
        let token = issuer.create_at(LOAD_MORE_ACTION, NOW);
        let half = (DAY / 2) as i64;

        assert!(issuer
            .verify_at(LOAD_MORE_ACTION, Some(&token), NOW + half)
            .is_ok());
        assert!(issuer
            .verify_at(LOAD_MORE_ACTION, Some(&token), NOW + 2 * half + 1)
            .is_err());
    }

    #[test]
    fn test_wrong_action_rejected() {
        let issuer = issuer();
        let token = issuer.create_at("other_action", NOW);
        assert!(issuer.verify_at(LOAD_MORE_ACTION, Some(&token), NOW).is_err());
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = NonceIssuer::new(b"another", DAY)
            .unwrap()
            .create_at(LOAD_MORE_ACTION, NOW);
        assert!(issuer().verify_at(LOAD_MORE_ACTION, Some(&token), NOW).is_err());
    }

    #[test]
    fn test_missing_or_malformed_token_rejected() {
        let issuer = issuer();
        for token in [None, Some(""), Some("not-hex"), Some("abcd")] {
            let err = issuer.verify_at(LOAD_MORE_ACTION, token, NOW).unwrap_err();
            assert!(matches!(err, ListingError::Authenticity(ref msg) if msg == SECURITY_CHECK_FAILED));
        }
    }

    #[test]
    fn test_random_issuers_differ() {
        let a = NonceIssuer::random(DAY).unwrap().create_at(LOAD_MORE_ACTION, NOW);
        let b = NonceIssuer::random(DAY).unwrap().create_at(LOAD_MORE_ACTION, NOW);
        assert_ne!(a, b);
    }
}
