//! Coordinator for deletions that span the database and media storage.
//!
//! The database side of a cascade is atomic through the unit of work.
//! Media objects live outside the transaction, so they are deleted
//! first on a best-effort basis: a failed media delete is logged and
//! the cascade proceeds, leaving at worst an orphaned object in the
//! media store rather than a half-deleted graph in the database.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::listing::Listing;
use crate::errors::DomainError;
use crate::repositories::{ListingRepository, UnitOfWork};
use crate::services::storage::MediaStorage;

/// Coordinates multi-store deletions
pub struct CascadeCoordinator<L, U, M>
where
    L: ListingRepository,
    U: UnitOfWork,
    M: MediaStorage,
{
    listings: Arc<L>,
    uow: Arc<U>,
    media: Arc<M>,
}

impl<L, U, M> CascadeCoordinator<L, U, M>
where
    L: ListingRepository,
    U: UnitOfWork,
    M: MediaStorage,
{
    pub fn new(listings: Arc<L>, uow: Arc<U>, media: Arc<M>) -> Self {
        Self {
            listings,
            uow,
            media,
        }
    }

    /// Deletes a listing, its dependents, and its media
    ///
    /// # Errors
    /// * `NotFound` - Listing does not exist
    pub async fn delete_listing(&self, listing_id: Uuid) -> Result<(), DomainError> {
        let listing = self
            .listings
            .find_by_id(listing_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Listing"))?;

        self.delete_media(&listing).await;
        self.uow.delete_listing_graph(listing_id).await?;

        info!(listing_id = %listing_id, "Deleted listing and its dependents");
        Ok(())
    }

    /// Clears a listing's dependents and media, keeping the listing row
    ///
    /// Used when an edit replaces a decided listing's content: the old
    /// images, requests, bookmarks, and listing-scoped notifications all
    /// refer to content that is about to disappear.
    pub async fn clear_listing(&self, listing: &Listing) -> Result<(), DomainError> {
        self.delete_media(listing).await;
        self.uow.clear_listing_dependents(listing.id).await?;

        info!(listing_id = %listing.id, "Cleared listing dependents");
        Ok(())
    }

    /// Deletes an account, everything it owns, and the owned media
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    pub async fn delete_account(&self, account_id: Uuid) -> Result<(), DomainError> {
        let owned = self.listings.find_by_owner(account_id).await?;
        for listing in &owned {
            self.delete_media(listing).await;
        }

        self.uow.delete_account_graph(account_id).await?;

        info!(
            account_id = %account_id,
            listings = owned.len(),
            "Deleted account and its dependents"
        );
        Ok(())
    }

    /// Best-effort media deletion; failures are logged, never returned
    async fn delete_media(&self, listing: &Listing) {
        for image in &listing.images {
            if let Err(e) = self.media.delete(&image.url).await {
                warn!(
                    listing_id = %listing.id,
                    url = %image.url,
                    error = %e,
                    "Media delete failed; continuing cascade"
                );
            }
        }
    }
}
