//! Per-listing review locks.
//!
//! Two admins reviewing the same listing at the same time must not
//! both get a decision through. The first reviewer takes the listing's
//! lock; the second is turned away immediately instead of waiting,
//! since the listing will already be decided by the time the lock
//! frees up.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// Registry of listings currently under review
#[derive(Clone, Default)]
pub struct ReviewLocks {
    held: Arc<Mutex<HashSet<Uuid>>>,
}

impl ReviewLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tries to take the lock for a listing without blocking
    ///
    /// # Returns
    /// * `Some(ReviewGuard)` - Lock taken; released when the guard drops
    /// * `None` - Another review holds the lock
    pub fn try_acquire(&self, listing_id: Uuid) -> Option<ReviewGuard> {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        if !held.insert(listing_id) {
            return None;
        }
        Some(ReviewGuard {
            held: self.held.clone(),
            listing_id,
        })
    }

    /// Whether a listing is currently locked
    pub fn is_held(&self, listing_id: Uuid) -> bool {
        let held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        held.contains(&listing_id)
    }
}

/// Releases the listing's review lock on drop
pub struct ReviewGuard {
    held: Arc<Mutex<HashSet<Uuid>>>,
    listing_id: Uuid,
}

impl Drop for ReviewGuard {
    fn drop(&mut self) {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        held.remove(&self.listing_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_guard_drops() {
        let locks = ReviewLocks::new();
        let id = Uuid::new_v4();

        let guard = locks.try_acquire(id).unwrap();
        assert!(locks.try_acquire(id).is_none());
        assert!(locks.is_held(id));

        drop(guard);
        assert!(!locks.is_held(id));
        assert!(locks.try_acquire(id).is_some());
    }

    #[test]
    fn locks_are_per_listing() {
        let locks = ReviewLocks::new();
        let _a = locks.try_acquire(Uuid::new_v4()).unwrap();
        assert!(locks.try_acquire(Uuid::new_v4()).is_some());
    }
}
