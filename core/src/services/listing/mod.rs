//! Listing lifecycle: creation, admin review, edits, deletion.

pub mod review_lock;
pub mod service;

#[cfg(test)]
mod tests;

pub use review_lock::{ReviewGuard, ReviewLocks};
pub use service::ListingService;
