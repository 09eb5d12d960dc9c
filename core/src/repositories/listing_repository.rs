//! Listing repository trait defining the interface for listing persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::listing::{Listing, ListingStatus};
use crate::errors::DomainError;

/// Repository trait for Listing entity persistence operations
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Find a listing by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, DomainError>;

    /// Find all listings owned by an account
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, DomainError>;

    /// Find all listings in a given status
    ///
    /// Admins use this to list the review queue.
    async fn find_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, DomainError>;

    /// Create a new listing
    async fn create(&self, listing: Listing) -> Result<Listing, DomainError>;

    /// Update an existing listing
    ///
    /// # Returns
    /// * `Ok(Listing)` - The updated listing
    /// * `Err(DomainError)` - Update failed (e.g., listing not found)
    async fn update(&self, listing: Listing) -> Result<Listing, DomainError>;

    /// Count all listings
    async fn count(&self) -> Result<u64, DomainError>;

    /// Count listings in a given status
    async fn count_by_status(&self, status: ListingStatus) -> Result<u64, DomainError>;
}
