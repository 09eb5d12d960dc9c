//! Rental request repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::rental_request::{RentalRequest, RequestStatus};
use crate::errors::DomainError;

/// Repository trait for RentalRequest entity persistence operations
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Find a rental request by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RentalRequest>, DomainError>;

    /// Find all requests placed on a listing
    async fn find_by_listing(&self, listing_id: Uuid) -> Result<Vec<RentalRequest>, DomainError>;

    /// Find all requests placed by a customer
    async fn find_by_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<RentalRequest>, DomainError>;

    /// Count live (pending or selected) requests on a listing
    ///
    /// Feeds the per-listing capacity check.
    async fn count_live_by_listing(&self, listing_id: Uuid) -> Result<u64, DomainError>;

    /// Whether the customer already has a live request on the listing
    async fn exists_live_by_listing_and_customer(
        &self,
        listing_id: Uuid,
        customer_id: Uuid,
    ) -> Result<bool, DomainError>;

    /// Create a new rental request
    ///
    /// Implementations re-check the duplicate and capacity rules while
    /// holding whatever lock guards the request table, so two racing
    /// creators cannot both slip through.
    async fn create(&self, request: RentalRequest) -> Result<RentalRequest, DomainError>;

    /// Update an existing rental request
    async fn update(&self, request: RentalRequest) -> Result<RentalRequest, DomainError>;

    /// Delete a rental request
    ///
    /// # Returns
    /// * `Ok(true)` - Request was deleted
    /// * `Ok(false)` - Request not found
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Count all requests, optionally filtered by status
    async fn count_by_status(&self, status: Option<RequestStatus>) -> Result<u64, DomainError>;
}
