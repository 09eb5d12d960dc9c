//! Saved listing (bookmark) service implementation.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::entities::saved_listing::SavedListing;
use crate::errors::DomainError;
use crate::repositories::{ListingRepository, SavedListingRepository};

/// Service managing a customer's bookmarked listings
pub struct SavedListingService<S, L>
where
    S: SavedListingRepository,
    L: ListingRepository,
{
    saved: Arc<S>,
    listings: Arc<L>,
}

impl<S, L> SavedListingService<S, L>
where
    S: SavedListingRepository,
    L: ListingRepository,
{
    pub fn new(saved: Arc<S>, listings: Arc<L>) -> Self {
        Self { saved, listings }
    }

    /// Bookmarks a listing for a customer
    ///
    /// # Errors
    /// * `NotFound` - Listing does not exist
    /// * `Validation` - Customer already bookmarked this listing
    pub async fn save(
        &self,
        customer_id: Uuid,
        listing_id: Uuid,
    ) -> Result<SavedListing, DomainError> {
        self.listings
            .find_by_id(listing_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Listing"))?;

        if self.saved.exists(customer_id, listing_id).await? {
            return Err(DomainError::Validation {
                message: "listing already saved".to_string(),
            });
        }

        let saved = self
            .saved
            .create(SavedListing::new(customer_id, listing_id))
            .await?;

        info!(customer_id = %customer_id, listing_id = %listing_id, "Listing bookmarked");
        Ok(saved)
    }

    /// Removes a customer's bookmark on a listing
    ///
    /// # Errors
    /// * `NotFound` - Customer has no bookmark on this listing
    pub async fn unsave(&self, customer_id: Uuid, listing_id: Uuid) -> Result<(), DomainError> {
        if !self.saved.delete(customer_id, listing_id).await? {
            return Err(DomainError::not_found("SavedListing"));
        }
        info!(customer_id = %customer_id, listing_id = %listing_id, "Bookmark removed");
        Ok(())
    }

    /// Returns all of a customer's bookmarks
    pub async fn list(&self, customer_id: Uuid) -> Result<Vec<SavedListing>, DomainError> {
        self.saved.find_by_customer(customer_id).await
    }
}
