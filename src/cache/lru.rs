//! LRU Tracker Module
//!
//! Recency bookkeeping for the entry cache's eviction policy.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks key recency for LRU eviction.
///
/// Keys live in a VecDeque: front = most recently used, back = least
/// recently used. Both insertion and a read hit advance a key to the front.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if new.
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    // == Remove ==
    /// Drops a key from the tracker; unknown keys are a no-op.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Pop LRU ==
    /// Removes and returns the least recently used key, if any.
    pub fn pop_lru(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    /// Returns the least recently used key without removing it.
    pub fn peek_lru(&self) -> Option<&String> {
        self.order.back()
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Empties the tracker.
    pub fn clear(&mut self) {
        self.order.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_recency_order() {
        let mut lru = LruTracker::new();

        lru.touch("a");
        lru.touch("b");
        lru.touch("c");

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_lru(), Some(&"a".to_string()));
    }

    #[test]
    fn test_touch_advances_existing_key() {
        let mut lru = LruTracker::new();

        lru.touch("a");
        lru.touch("b");
        lru.touch("c");
        lru.touch("a");

        // "a" moved to the front, so "b" is now the victim
        assert_eq!(lru.len(), 3);
        assert_eq!(lru.pop_lru(), Some("b".to_string()));
        assert_eq!(lru.pop_lru(), Some("c".to_string()));
        assert_eq!(lru.pop_lru(), Some("a".to_string()));
        assert_eq!(lru.pop_lru(), None);
    }

    #[test]
    fn test_touch_same_key_keeps_single_slot() {
        let mut lru = LruTracker::new();

        lru.touch("a");
        lru.touch("a");
        lru.touch("a");

        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_remove_unknown_key_is_noop() {
        let mut lru = LruTracker::new();
        lru.touch("a");

        lru.remove("missing");

        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.touch("b");

        lru.clear();

        assert!(lru.is_empty());
        assert_eq!(lru.pop_lru(), None);
    }
}
