//! Rental request service implementation.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::listing::{Listing, ListingStatus};
use crate::domain::entities::rental_request::{RentalRequest, RequestStatus};
use crate::errors::{AuthError, DomainError, ListingError, RequestError};
use crate::repositories::{ListingRepository, RequestRepository, UnitOfWork};
use crate::services::notification::{NotificationDraft, Notifier};

/// Service managing rental requests on listings
///
/// Selection is the delicate operation: one request wins, every other
/// pending request on the listing loses, and the listing itself goes
/// to `Rented`. The whole transition runs atomically through the unit
/// of work so a crash or a racing call can never leave two winners.
pub struct RequestService<R, L, U, N>
where
    R: RequestRepository,
    L: ListingRepository,
    U: UnitOfWork,
    N: Notifier,
{
    requests: Arc<R>,
    listings: Arc<L>,
    uow: Arc<U>,
    notifier: Arc<N>,
}

impl<R, L, U, N> RequestService<R, L, U, N>
where
    R: RequestRepository,
    L: ListingRepository,
    U: UnitOfWork,
    N: Notifier,
{
    pub fn new(requests: Arc<R>, listings: Arc<L>, uow: Arc<U>, notifier: Arc<N>) -> Self {
        Self {
            requests,
            listings,
            uow,
            notifier,
        }
    }

    /// Places a rental request on a listing
    ///
    /// The repository enforces the duplicate and capacity rules under
    /// its own lock, so concurrent creators cannot both get through a
    /// nearly-full listing.
    ///
    /// # Errors
    /// * `NotFound` - Listing does not exist
    /// * `ListingError::InvalidStatus` - Listing is not approved
    /// * `RequestError::Duplicate` - Customer already has a live request here
    /// * `RequestError::LimitExceeded` - Listing is at capacity
    pub async fn create(
        &self,
        customer_id: Uuid,
        listing_id: Uuid,
        message: Option<String>,
    ) -> Result<RentalRequest, DomainError> {
        let listing = self.listing(listing_id).await?;
        if listing.status != ListingStatus::Approved {
            return Err(ListingError::InvalidStatus { action: "request" }.into());
        }
        if listing.is_owned_by(customer_id) {
            return Err(AuthError::NotAuthorized.into());
        }

        let request = RentalRequest::new(listing_id, customer_id, message);
        let request = self.requests.create(request).await?;

        self.notify(
            listing.owner_id,
            "New rental request",
            format!("A customer applied to rent \"{}\"", listing.title),
            listing_id,
        )
        .await;
        self.notify(
            customer_id,
            "Rental request placed",
            format!("Your request for \"{}\" was placed", listing.title),
            listing_id,
        )
        .await;

        info!(request_id = %request.id, listing_id = %listing_id, "Rental request placed");
        Ok(request)
    }

    /// Cancels a customer's own pending request
    ///
    /// The row is deleted outright, freeing its slot on the listing.
    ///
    /// # Errors
    /// * `NotFound` - Request does not exist
    /// * `AuthError::NotAuthorized` - Caller did not place the request
    /// * `RequestError::InvalidStatus` - Request is no longer pending
    pub async fn cancel(&self, customer_id: Uuid, request_id: Uuid) -> Result<(), DomainError> {
        let request = self.request(request_id).await?;
        if request.customer_id != customer_id {
            return Err(AuthError::NotAuthorized.into());
        }
        if request.status != RequestStatus::Pending {
            return Err(RequestError::InvalidStatus {
                status: request.status,
            }
            .into());
        }

        self.requests.delete(request_id).await?;

        if let Ok(listing) = self.listing(request.listing_id).await {
            self.notify(
                listing.owner_id,
                "Rental request cancelled",
                format!("A customer withdrew their request for \"{}\"", listing.title),
                listing.id,
            )
            .await;
        }

        info!(request_id = %request_id, "Rental request cancelled");
        Ok(())
    }

    /// Rejects a single pending request on the owner's listing
    ///
    /// # Errors
    /// * `AuthError::NotAuthorized` - Caller does not own the listing
    /// * `RequestError::InvalidStatus` - Request is not pending
    pub async fn reject(
        &self,
        owner_id: Uuid,
        request_id: Uuid,
    ) -> Result<RentalRequest, DomainError> {
        let mut request = self.request(request_id).await?;
        let listing = self.listing(request.listing_id).await?;
        if !listing.is_owned_by(owner_id) {
            return Err(AuthError::NotAuthorized.into());
        }
        if request.status != RequestStatus::Pending {
            return Err(RequestError::InvalidStatus {
                status: request.status,
            }
            .into());
        }

        request.set_status(RequestStatus::Rejected);
        let request = self.requests.update(request).await?;

        self.notify(
            request.customer_id,
            "Rental request rejected",
            format!("Your request for \"{}\" was rejected", listing.title),
            listing.id,
        )
        .await;

        Ok(request)
    }

    /// Selects the winning request on a listing
    ///
    /// Atomically: the request becomes `Selected`, every other pending
    /// request becomes `Rejected`, and the listing becomes `Rented`
    /// with the winner as tenant. Winner and losers are then notified.
    ///
    /// # Errors
    /// * `AuthError::NotAuthorized` - Caller does not own the listing
    /// * `RequestError::InvalidStatus` - Request is not pending
    /// * `ListingError::InvalidStatus` - Listing is not approved
    pub async fn select(
        &self,
        owner_id: Uuid,
        listing_id: Uuid,
        request_id: Uuid,
    ) -> Result<RentalRequest, DomainError> {
        let listing = self.listing(listing_id).await?;
        if !listing.is_owned_by(owner_id) {
            return Err(AuthError::NotAuthorized.into());
        }

        let outcome = self.uow.apply_selection(listing_id, request_id).await?;

        self.notify(
            outcome.selected.customer_id,
            "Rental request selected",
            format!("You were selected to rent \"{}\"", outcome.listing.title),
            listing_id,
        )
        .await;
        for loser in &outcome.rejected {
            self.notify(
                loser.customer_id,
                "Rental request rejected",
                format!(
                    "Another customer was selected for \"{}\"",
                    outcome.listing.title
                ),
                listing_id,
            )
            .await;
        }

        info!(
            listing_id = %listing_id,
            request_id = %request_id,
            rejected = outcome.rejected.len(),
            "Rental request selected"
        );
        Ok(outcome.selected)
    }

    /// Requests placed on a listing, visible to its owner
    pub async fn for_listing(
        &self,
        owner_id: Uuid,
        listing_id: Uuid,
    ) -> Result<Vec<RentalRequest>, DomainError> {
        let listing = self.listing(listing_id).await?;
        if !listing.is_owned_by(owner_id) {
            return Err(AuthError::NotAuthorized.into());
        }
        self.requests.find_by_listing(listing_id).await
    }

    /// Requests placed by a customer
    pub async fn for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<RentalRequest>, DomainError> {
        self.requests.find_by_customer(customer_id).await
    }

    /// Share of all requests that ended up selected, as a percentage
    ///
    /// An empty table yields 0.0 rather than a division error.
    pub async fn selected_percentage(&self) -> Result<f64, DomainError> {
        let total = self.requests.count_by_status(None).await?;
        if total == 0 {
            return Ok(0.0);
        }
        let selected = self
            .requests
            .count_by_status(Some(RequestStatus::Selected))
            .await?;
        Ok(selected as f64 / total as f64 * 100.0)
    }

    async fn listing(&self, id: Uuid) -> Result<Listing, DomainError> {
        self.listings
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Listing"))
    }

    async fn request(&self, id: Uuid) -> Result<RentalRequest, DomainError> {
        self.requests
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("RentalRequest"))
    }

    async fn notify(&self, recipient: Uuid, title: &str, body: String, listing_id: Uuid) {
        let draft = NotificationDraft::new(recipient, title, body, Some(listing_id));
        if let Err(e) = self.notifier.notify(draft).await {
            warn!(recipient = %recipient, error = %e, "Notification delivery failed");
        }
    }
}
