//! Saved listing repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::saved_listing::SavedListing;
use crate::errors::DomainError;

/// Repository trait for SavedListing persistence operations
#[async_trait]
pub trait SavedListingRepository: Send + Sync {
    /// Find all bookmarks placed by a customer
    async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<SavedListing>, DomainError>;

    /// Whether the customer already bookmarked the listing
    async fn exists(&self, customer_id: Uuid, listing_id: Uuid) -> Result<bool, DomainError>;

    /// Create a new bookmark
    async fn create(&self, saved: SavedListing) -> Result<SavedListing, DomainError>;

    /// Delete a customer's bookmark on a listing
    ///
    /// # Returns
    /// * `Ok(true)` - Bookmark was deleted
    /// * `Ok(false)` - No such bookmark
    async fn delete(&self, customer_id: Uuid, listing_id: Uuid) -> Result<bool, DomainError>;
}
