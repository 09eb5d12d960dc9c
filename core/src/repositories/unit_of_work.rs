//! Unit-of-work trait for multi-entity transitions that must be atomic.
//!
//! The per-entity repositories cover single-row operations. Transitions
//! that touch several tables at once (selecting a request, cascading a
//! deletion) go through this port so an implementation can wrap them in
//! one database transaction, or one lock section for the in-memory store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::listing::Listing;
use crate::domain::entities::rental_request::RentalRequest;
use crate::errors::DomainError;

/// Result of atomically selecting a rental request
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    /// The listing, now rented to the selected customer
    pub listing: Listing,
    /// The request that won
    pub selected: RentalRequest,
    /// Sibling requests that were still pending and got rejected
    pub rejected: Vec<RentalRequest>,
}

/// Port for atomic composite persistence operations
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Atomically selects one rental request on a listing.
    ///
    /// In a single transaction: the request moves to `Selected`, every
    /// other pending request on the same listing moves to `Rejected`,
    /// and the listing moves to `Rented` with the winning customer as
    /// tenant. Either all of it lands or none of it does.
    ///
    /// # Errors
    /// * `NotFound` - Listing or request does not exist
    /// * `RequestError::InvalidStatus` - The request is not pending
    /// * `ListingError::InvalidStatus` - The listing is not approved
    /// * `AuthError::NotAuthorized` - The request is not on the listing
    async fn apply_selection(
        &self,
        listing_id: Uuid,
        request_id: Uuid,
    ) -> Result<SelectionOutcome, DomainError>;

    /// Atomically removes everything hanging off a listing while
    /// keeping the listing itself: rental requests, bookmarks, and
    /// notifications that reference it. Used when an edit sends a
    /// decided listing back to review.
    async fn clear_listing_dependents(&self, listing_id: Uuid) -> Result<(), DomainError>;

    /// Atomically deletes a listing and its whole dependent graph, in
    /// order: notifications referencing it, rental requests on it,
    /// bookmarks on it, then the listing row itself.
    ///
    /// # Errors
    /// * `NotFound` - Listing does not exist
    async fn delete_listing_graph(&self, listing_id: Uuid) -> Result<(), DomainError>;

    /// Atomically deletes an account and its whole dependent graph:
    /// the account's notifications, its rental requests, its bookmarks,
    /// every listing it owns (each with its own dependent graph), then
    /// the account row itself.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    async fn delete_account_graph(&self, account_id: Uuid) -> Result<(), DomainError>;
}
