//! Visited registry: identity → visit count
//!
//! The map is only reachable through [`VisitedRegistry::register_or_increment`],
//! [`VisitedRegistry::is_full`] and [`VisitedRegistry::snapshot`]. Each of them
//! takes the one lock for its whole duration, so the page-limit check and the
//! insert decision can never be split by another worker.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Result of recording one observation of a page identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First sighting; the caller owns the fetch for this page
    First,

    /// Already registered; the count after incrementing
    Repeat { count: usize },

    /// New identity refused because the registry holds `max_pages` entries
    LimitReached,
}

/// Thread-safe, grow-only map of page identities to visit counts
#[derive(Debug)]
pub struct VisitedRegistry {
    max_pages: usize,
    pages: Mutex<HashMap<String, usize>>,
}

impl VisitedRegistry {
    /// Creates an empty registry that accepts at most `max_pages` identities
    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages,
            pages: Mutex::new(HashMap::new()),
        }
    }

    /// Records one observation of `identity`
    ///
    /// Known identities are always incremented, even once the registry is
    /// full. A new identity is inserted with count 1 unless the registry has
    /// already reached its page limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_crawler::state::{Registration, VisitedRegistry};
    ///
    /// let registry = VisitedRegistry::new(1);
    /// assert_eq!(registry.register_or_increment("a.com"), Registration::First);
    /// assert_eq!(registry.register_or_increment("a.com/x"), Registration::LimitReached);
    /// assert_eq!(registry.register_or_increment("a.com"), Registration::Repeat { count: 2 });
    /// ```
    pub fn register_or_increment(&self, identity: &str) -> Registration {
        let mut pages = self.lock();

        if let Some(count) = pages.get_mut(identity) {
            *count += 1;
            return Registration::Repeat { count: *count };
        }

        if pages.len() >= self.max_pages {
            return Registration::LimitReached;
        }

        pages.insert(identity.to_string(), 1);
        Registration::First
    }

    /// Returns true once the number of distinct identities reached the limit
    pub fn is_full(&self) -> bool {
        self.lock().len() >= self.max_pages
    }

    /// The page limit this registry enforces
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Copies out the current identity → count map
    pub fn snapshot(&self) -> HashMap<String, usize> {
        self.lock().clone()
    }

    // A panic elsewhere cannot leave the map half-updated: every mutation is
    // a single insert or increment.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, usize>> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_first_then_repeat() {
        let registry = VisitedRegistry::new(10);
        assert_eq!(registry.register_or_increment("a.com/x"), Registration::First);
        assert_eq!(
            registry.register_or_increment("a.com/x"),
            Registration::Repeat { count: 2 }
        );
        assert_eq!(
            registry.register_or_increment("a.com/x"),
            Registration::Repeat { count: 3 }
        );
        assert_eq!(registry.snapshot().len(), 1);
    }

    #[test]
    fn test_limit_blocks_only_new_identities() {
        let registry = VisitedRegistry::new(2);
        assert_eq!(registry.register_or_increment("a"), Registration::First);
        assert_eq!(registry.register_or_increment("b"), Registration::First);
        assert!(registry.is_full());

        assert_eq!(registry.register_or_increment("c"), Registration::LimitReached);
        assert_eq!(
            registry.register_or_increment("a"),
            Registration::Repeat { count: 2 }
        );
        assert_eq!(registry.snapshot().len(), 2);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let registry = VisitedRegistry::new(5);
        registry.register_or_increment("a");
        let snapshot = registry.snapshot();
        registry.register_or_increment("a");

        assert_eq!(snapshot.get("a"), Some(&1));
        assert_eq!(registry.snapshot().get("a"), Some(&2));
    }

    #[test]
    fn test_empty_registry() {
        let registry = VisitedRegistry::new(3);
        assert!(registry.snapshot().is_empty());
        assert!(!registry.is_full());
        assert_eq!(registry.max_pages(), 3);
    }

    #[test]
    fn test_racing_threads_register_once() {
        let registry = Arc::new(VisitedRegistry::new(100));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.register_or_increment("a.com/race") == Registration::First)
            })
            .collect();

        let firsts = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|first| *first)
            .count();

        assert_eq!(firsts, 1);
        assert_eq!(registry.snapshot().get("a.com/race"), Some(&16));
    }

    #[test]
    fn test_racing_threads_respect_limit() {
        let registry = Arc::new(VisitedRegistry::new(7));
        let handles: Vec<_> = (0..50)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    registry.register_or_increment(&format!("a.com/{}", i));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().len(), 7);
    }
}
