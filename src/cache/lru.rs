//! LRU Tracker Module
//!
//! Access order of cached listings, used to bound the transient store.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Keys ordered from most recently used (front) to least recently used (back).
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as just used.
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    /// Stops tracking a key.
    pub fn remove(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    /// Pops the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    /// Drops every tracked key starting with `prefix`.
    pub fn remove_prefixed(&mut self, prefix: &str) {
        self.order.retain(|k| !k.starts_with(prefix));
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
