//! Listing lifecycle service implementation.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::domain::entities::listing::{Listing, ListingStatus};
use crate::domain::value_objects::listing_draft::ListingDraft;
use crate::errors::{AuthError, DomainError, ListingError};
use crate::repositories::{AccountRepository, ListingRepository, UnitOfWork};
use crate::services::coordinator::CascadeCoordinator;
use crate::services::notification::{NotificationDraft, Notifier};
use crate::services::storage::MediaStorage;

use super::review_lock::ReviewLocks;

/// Service managing the listing lifecycle
///
/// Reviews are serialized per listing through [`ReviewLocks`]: the
/// losing admin gets `Locked` right away rather than queueing up behind
/// a decision that will make their own review moot.
pub struct ListingService<L, A, U, M, N>
where
    L: ListingRepository,
    A: AccountRepository,
    U: UnitOfWork,
    M: MediaStorage,
    N: Notifier,
{
    listings: Arc<L>,
    accounts: Arc<A>,
    coordinator: Arc<CascadeCoordinator<L, U, M>>,
    notifier: Arc<N>,
    review_locks: ReviewLocks,
}

impl<L, A, U, M, N> ListingService<L, A, U, M, N>
where
    L: ListingRepository,
    A: AccountRepository,
    U: UnitOfWork,
    M: MediaStorage,
    N: Notifier,
{
    pub fn new(
        listings: Arc<L>,
        accounts: Arc<A>,
        coordinator: Arc<CascadeCoordinator<L, U, M>>,
        notifier: Arc<N>,
        review_locks: ReviewLocks,
    ) -> Self {
        Self {
            listings,
            accounts,
            coordinator,
            notifier,
            review_locks,
        }
    }

    /// Creates a listing and puts it in the review queue
    ///
    /// The owner gets a confirmation and every admin a notification
    /// that a listing awaits review.
    ///
    /// # Errors
    /// * `Validation` - Draft fails validation
    /// * `AuthError::NotAuthorized` - Creator is not an owner account
    pub async fn create(
        &self,
        owner_id: Uuid,
        draft: ListingDraft,
        image_urls: Vec<String>,
    ) -> Result<Listing, DomainError> {
        draft.validate()?;
        let owner = self.account(owner_id).await?;
        if !owner.is_owner() {
            return Err(AuthError::NotAuthorized.into());
        }

        let listing = Listing::new(owner_id, draft, image_urls);
        let listing = self.listings.create(listing).await?;

        self.notify(
            owner_id,
            "Listing submitted",
            format!("\"{}\" was submitted and awaits review", listing.title),
            listing.id,
        )
        .await;
        self.notify_admins(
            "Listing awaiting review",
            format!("\"{}\" was submitted for review", listing.title),
            listing.id,
        )
        .await;

        info!(listing_id = %listing.id, owner_id = %owner_id, "Listing created");
        Ok(listing)
    }

    /// Decides a listing's review
    ///
    /// The listing's review lock is taken without blocking; a second
    /// admin arriving while the first decision is in flight gets
    /// `Locked`. A listing that was already decided yields
    /// `AlreadyReviewed` naming the earlier reviewer.
    ///
    /// # Errors
    /// * `AuthError::NotAuthorized` - Caller is not an admin
    /// * `ListingError::Locked` - Another review is in flight
    /// * `ListingError::AlreadyReviewed` - Listing was already decided
    pub async fn review(
        &self,
        admin_id: Uuid,
        listing_id: Uuid,
        approved: bool,
        reject_reason: Option<String>,
    ) -> Result<Listing, DomainError> {
        let admin = self.account(admin_id).await?;
        if !admin.is_admin() {
            return Err(AuthError::NotAuthorized.into());
        }

        let _guard = self
            .review_locks
            .try_acquire(listing_id)
            .ok_or(ListingError::Locked)?;

        let mut listing = self.listing(listing_id).await?;
        listing.decide_review(approved, admin_id, reject_reason.clone())?;
        let listing = self.listings.update(listing).await?;

        let (title, body) = if approved {
            (
                "Listing approved",
                format!("\"{}\" is now visible to customers", listing.title),
            )
        } else {
            (
                "Listing rejected",
                match reject_reason {
                    Some(reason) => format!("\"{}\" was rejected: {reason}", listing.title),
                    None => format!("\"{}\" was rejected", listing.title),
                },
            )
        };
        self.notify(listing.owner_id, title, body, listing.id).await;

        info!(
            listing_id = %listing_id,
            admin_id = %admin_id,
            approved,
            "Listing reviewed"
        );
        Ok(listing)
    }

    /// Applies an owner's edit
    ///
    /// A decided listing goes back to the review queue; when it was
    /// approved, its live requests, bookmarks, and listing-scoped
    /// notifications are cleared first so no one holds a stake in
    /// content that no longer exists.
    ///
    /// # Errors
    /// * `AuthError::NotAuthorized` - Caller does not own the listing
    /// * `ListingError::InvalidStatus` - Listing is already rented
    pub async fn edit(
        &self,
        owner_id: Uuid,
        listing_id: Uuid,
        draft: ListingDraft,
        image_urls: Vec<String>,
    ) -> Result<Listing, DomainError> {
        draft.validate()?;
        let mut listing = self.listing(listing_id).await?;
        if !listing.is_owned_by(owner_id) {
            return Err(AuthError::NotAuthorized.into());
        }
        if matches!(listing.status, ListingStatus::Rented | ListingStatus::Expired) {
            return Err(ListingError::InvalidStatus { action: "edit" }.into());
        }

        let went_back_to_review =
            matches!(listing.status, ListingStatus::Approved | ListingStatus::Rejected);
        if went_back_to_review {
            self.coordinator.clear_listing(&listing).await?;
            listing.current_tenants = 0;
        }
        listing.apply_edit(draft, image_urls);
        let listing = self.listings.update(listing).await?;
        if went_back_to_review {
            self.notify_admins(
                "Listing awaiting review",
                format!("\"{}\" was edited and resubmitted for review", listing.title),
                listing.id,
            )
            .await;
        }

        info!(listing_id = %listing_id, "Listing edited");
        Ok(listing)
    }

    /// Deletes a listing together with its dependents and media
    ///
    /// Allowed for the owner and for admins.
    pub async fn delete(&self, actor_id: Uuid, listing_id: Uuid) -> Result<(), DomainError> {
        let actor = self.account(actor_id).await?;
        let listing = self.listing(listing_id).await?;
        if !listing.is_owned_by(actor_id) && !actor.is_admin() {
            return Err(AuthError::NotAuthorized.into());
        }

        self.coordinator.delete_listing(listing_id).await
    }

    /// Listings waiting for a review decision
    pub async fn review_queue(&self, admin_id: Uuid) -> Result<Vec<Listing>, DomainError> {
        let admin = self.account(admin_id).await?;
        if !admin.is_admin() {
            return Err(AuthError::NotAuthorized.into());
        }
        self.listings.find_by_status(ListingStatus::PendingReview).await
    }

    /// Share of listings that ended up rented, as a percentage
    ///
    /// An empty table yields 0.0 rather than a division error.
    pub async fn rented_percentage(&self) -> Result<f64, DomainError> {
        let total = self.listings.count().await?;
        if total == 0 {
            return Ok(0.0);
        }
        let rented = self.listings.count_by_status(ListingStatus::Rented).await?;
        Ok(rented as f64 / total as f64 * 100.0)
    }

    async fn account(&self, id: Uuid) -> Result<Account, DomainError> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Account"))
    }

    async fn listing(&self, id: Uuid) -> Result<Listing, DomainError> {
        self.listings
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Listing"))
    }

    async fn notify(&self, recipient: Uuid, title: &str, body: String, listing_id: Uuid) {
        let draft = NotificationDraft::new(recipient, title, body, Some(listing_id));
        if let Err(e) = self.notifier.notify(draft).await {
            warn!(recipient = %recipient, error = %e, "Notification delivery failed");
        }
    }

    async fn notify_admins(&self, title: &str, body: String, listing_id: Uuid) {
        let admins = match self.accounts.find_admins().await {
            Ok(admins) => admins,
            Err(e) => {
                warn!(error = %e, "Could not resolve admin accounts for notification");
                return;
            }
        };
        for admin in admins {
            self.notify(admin.id, title, body.clone(), listing_id).await;
        }
    }
}
