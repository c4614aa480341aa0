//! LRU Tracker Module
//!
//! Access order of stored keys, used to pick eviction victims once the
//! in-process store reaches its threshold.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Front = most recently used, back = least recently used.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Moves `key` to the front, inserting it if new.
    ///
    /// # Arguments
    /// * `key` - Scoped key that was just read or written
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    /// Forgets `key`; a no-op if it is not tracked.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    /// Drops every key rejected by `keep`.
    ///
    /// # Arguments
    /// * `keep` - Predicate returning true for keys that stay tracked
    ///
    /// # Example
    /// ```ignore
    /// // Forget a whole namespace after a prefix clear
    /// lru.retain(|key| !key.starts_with("app:users:"));
    /// ```
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.order.retain(|k| keep(k));
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    ///
    /// # Returns
    /// The evicted key, or `None` when nothing is tracked.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.back()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.order.len()
    }
}
