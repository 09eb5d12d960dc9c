//! In-memory store implementing every repository port plus the
//! unit-of-work port.
//!
//! All tables live behind one `RwLock`, so the composite operations of
//! [`UnitOfWork`] run under a single write guard and are atomic with
//! respect to every other operation on the store. The test suites run
//! against this store; production uses the MySQL implementations in
//! the infrastructure crate.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::account::{Account, Role};
use crate::domain::entities::listing::{Listing, ListingStatus};
use crate::domain::entities::notification::Notification;
use crate::domain::entities::rental_request::{RentalRequest, RequestStatus};
use crate::domain::entities::saved_listing::SavedListing;
use crate::errors::{AuthError, DomainError, ListingError, RequestError};
use crate::repositories::account_repository::AccountRepository;
use crate::repositories::listing_repository::ListingRepository;
use crate::repositories::notification_repository::NotificationRepository;
use crate::repositories::request_repository::RequestRepository;
use crate::repositories::saved_listing_repository::SavedListingRepository;
use crate::repositories::unit_of_work::{SelectionOutcome, UnitOfWork};

#[derive(Default)]
struct Tables {
    accounts: HashMap<Uuid, Account>,
    listings: HashMap<Uuid, Listing>,
    requests: HashMap<Uuid, RentalRequest>,
    notifications: HashMap<Uuid, Notification>,
    saved: HashMap<Uuid, SavedListing>,
}

impl Tables {
    fn live_request_count(&self, listing_id: Uuid) -> u64 {
        self.requests
            .values()
            .filter(|r| r.listing_id == listing_id && r.status.is_live())
            .count() as u64
    }

    /// Keeps `current_tenants` equal to the live request count
    fn refresh_tenant_count(&mut self, listing_id: Uuid) {
        let live = self.live_request_count(listing_id) as u32;
        if let Some(listing) = self.listings.get_mut(&listing_id) {
            listing.current_tenants = live;
        }
    }

    /// Removes requests, bookmarks and notifications tied to a listing
    fn drop_listing_dependents(&mut self, listing_id: Uuid) {
        self.notifications
            .retain(|_, n| n.listing_id != Some(listing_id));
        self.requests.retain(|_, r| r.listing_id != listing_id);
        self.saved.retain(|_, s| s.listing_id != listing_id);
        self.refresh_tenant_count(listing_id);
    }
}

/// Shared in-memory store backing every repository trait
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn find_admins(&self) -> Result<Vec<Account>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .filter(|a| a.role == Role::Admin)
            .cloned()
            .collect())
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut tables = self.tables.write().await;
        if tables
            .accounts
            .values()
            .any(|a| a.username == account.username)
        {
            return Err(DomainError::Validation {
                message: "username already taken".to_string(),
            });
        }
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&account.id) {
            return Err(DomainError::not_found("Account"));
        }
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn count_by_role(&self, role: Option<Role>) -> Result<u64, DomainError> {
        let tables = self.tables.read().await;
        let count = match role {
            Some(role) => tables.accounts.values().filter(|a| a.role == role).count(),
            None => tables.accounts.len(),
        };
        Ok(count as u64)
    }

    async fn count_enabled(&self) -> Result<u64, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().filter(|a| a.enabled).count() as u64)
    }
}

#[async_trait]
impl ListingRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.listings.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .listings
            .values()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .listings
            .values()
            .filter(|l| l.status == status)
            .cloned()
            .collect())
    }

    async fn create(&self, listing: Listing) -> Result<Listing, DomainError> {
        let mut tables = self.tables.write().await;
        tables.listings.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn update(&self, listing: Listing) -> Result<Listing, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.listings.contains_key(&listing.id) {
            return Err(DomainError::not_found("Listing"));
        }
        tables.listings.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.listings.len() as u64)
    }

    async fn count_by_status(&self, status: ListingStatus) -> Result<u64, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .listings
            .values()
            .filter(|l| l.status == status)
            .count() as u64)
    }
}

#[async_trait]
impl RequestRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RentalRequest>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.requests.get(&id).cloned())
    }

    async fn find_by_listing(
        &self,
        listing_id: Uuid,
    ) -> Result<Vec<RentalRequest>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .requests
            .values()
            .filter(|r| r.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn find_by_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<RentalRequest>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .requests
            .values()
            .filter(|r| r.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn count_live_by_listing(&self, listing_id: Uuid) -> Result<u64, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.live_request_count(listing_id))
    }

    async fn exists_live_by_listing_and_customer(
        &self,
        listing_id: Uuid,
        customer_id: Uuid,
    ) -> Result<bool, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.requests.values().any(|r| {
            r.listing_id == listing_id && r.customer_id == customer_id && r.status.is_live()
        }))
    }

    async fn create(&self, request: RentalRequest) -> Result<RentalRequest, DomainError> {
        let mut tables = self.tables.write().await;

        let listing = tables
            .listings
            .get(&request.listing_id)
            .ok_or_else(|| DomainError::not_found("Listing"))?;
        let max = listing.max_tenants;

        // Re-checked under the write guard: of two racing creators,
        // the second one sees the first one's row.
        if tables.requests.values().any(|r| {
            r.listing_id == request.listing_id
                && r.customer_id == request.customer_id
                && r.status.is_live()
        }) {
            return Err(RequestError::Duplicate.into());
        }
        if tables.live_request_count(request.listing_id) >= u64::from(max) {
            return Err(RequestError::LimitExceeded { max }.into());
        }

        tables.requests.insert(request.id, request.clone());
        tables.refresh_tenant_count(request.listing_id);
        Ok(request)
    }

    async fn update(&self, request: RentalRequest) -> Result<RentalRequest, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.requests.contains_key(&request.id) {
            return Err(DomainError::not_found("RentalRequest"));
        }
        let listing_id = request.listing_id;
        tables.requests.insert(request.id, request.clone());
        tables.refresh_tenant_count(listing_id);
        Ok(request)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        match tables.requests.remove(&id) {
            Some(request) => {
                tables.refresh_tenant_count(request.listing_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_by_status(&self, status: Option<RequestStatus>) -> Result<u64, DomainError> {
        let tables = self.tables.read().await;
        let count = match status {
            Some(status) => tables
                .requests
                .values()
                .filter(|r| r.status == status)
                .count(),
            None => tables.requests.len(),
        };
        Ok(count as u64)
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.notifications.get(&id).cloned())
    }

    async fn find_by_recipient(
        &self,
        recipient_id: Uuid,
    ) -> Result<Vec<Notification>, DomainError> {
        let tables = self.tables.read().await;
        let mut items: Vec<Notification> = tables
            .notifications
            .values()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn count_unread(&self, recipient_id: Uuid) -> Result<u64, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .notifications
            .values()
            .filter(|n| n.recipient_id == recipient_id && !n.read)
            .count() as u64)
    }

    async fn create(&self, notification: Notification) -> Result<Notification, DomainError> {
        let mut tables = self.tables.write().await;
        tables
            .notifications
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn update(&self, notification: Notification) -> Result<Notification, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.notifications.contains_key(&notification.id) {
            return Err(DomainError::not_found("Notification"));
        }
        tables
            .notifications
            .insert(notification.id, notification.clone());
        Ok(notification)
    }
}

#[async_trait]
impl SavedListingRepository for InMemoryStore {
    async fn find_by_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<SavedListing>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .saved
            .values()
            .filter(|s| s.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn exists(&self, customer_id: Uuid, listing_id: Uuid) -> Result<bool, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .saved
            .values()
            .any(|s| s.customer_id == customer_id && s.listing_id == listing_id))
    }

    async fn create(&self, saved: SavedListing) -> Result<SavedListing, DomainError> {
        let mut tables = self.tables.write().await;
        if tables
            .saved
            .values()
            .any(|s| s.customer_id == saved.customer_id && s.listing_id == saved.listing_id)
        {
            return Err(DomainError::Validation {
                message: "listing already saved".to_string(),
            });
        }
        tables.saved.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn delete(&self, customer_id: Uuid, listing_id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let id = tables
            .saved
            .values()
            .find(|s| s.customer_id == customer_id && s.listing_id == listing_id)
            .map(|s| s.id);
        match id {
            Some(id) => {
                tables.saved.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl UnitOfWork for InMemoryStore {
    async fn apply_selection(
        &self,
        listing_id: Uuid,
        request_id: Uuid,
    ) -> Result<SelectionOutcome, DomainError> {
        let mut tables = self.tables.write().await;

        let request = tables
            .requests
            .get(&request_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("RentalRequest"))?;
        if request.listing_id != listing_id {
            return Err(AuthError::NotAuthorized.into());
        }
        if request.status != RequestStatus::Pending {
            return Err(RequestError::InvalidStatus {
                status: request.status,
            }
            .into());
        }

        let mut listing = tables
            .listings
            .get(&listing_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Listing"))?;
        if listing.status != ListingStatus::Approved {
            return Err(ListingError::InvalidStatus { action: "rented" }.into());
        }

        let mut selected = request;
        selected.set_status(RequestStatus::Selected);

        let mut rejected = Vec::new();
        let sibling_ids: Vec<Uuid> = tables
            .requests
            .values()
            .filter(|r| {
                r.listing_id == listing_id
                    && r.id != request_id
                    && r.status == RequestStatus::Pending
            })
            .map(|r| r.id)
            .collect();
        for id in sibling_ids {
            if let Some(sibling) = tables.requests.get_mut(&id) {
                sibling.set_status(RequestStatus::Rejected);
                rejected.push(sibling.clone());
            }
        }

        listing.mark_rented(selected.customer_id)?;

        tables.requests.insert(selected.id, selected.clone());
        tables.listings.insert(listing.id, listing.clone());
        tables.refresh_tenant_count(listing_id);

        // refresh_tenant_count rewrote the stored copy; report it
        let listing = tables
            .listings
            .get(&listing_id)
            .cloned()
            .unwrap_or(listing);

        Ok(SelectionOutcome {
            listing,
            selected,
            rejected,
        })
    }

    async fn clear_listing_dependents(&self, listing_id: Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.listings.contains_key(&listing_id) {
            return Err(DomainError::not_found("Listing"));
        }
        tables.drop_listing_dependents(listing_id);
        Ok(())
    }

    async fn delete_listing_graph(&self, listing_id: Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.listings.contains_key(&listing_id) {
            return Err(DomainError::not_found("Listing"));
        }
        tables.drop_listing_dependents(listing_id);
        tables.listings.remove(&listing_id);
        Ok(())
    }

    async fn delete_account_graph(&self, account_id: Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&account_id) {
            return Err(DomainError::not_found("Account"));
        }

        tables
            .notifications
            .retain(|_, n| n.recipient_id != account_id);
        let request_listings: Vec<Uuid> = tables
            .requests
            .values()
            .filter(|r| r.customer_id == account_id)
            .map(|r| r.listing_id)
            .collect();
        tables.requests.retain(|_, r| r.customer_id != account_id);
        for listing_id in request_listings {
            tables.refresh_tenant_count(listing_id);
        }
        tables.saved.retain(|_, s| s.customer_id != account_id);

        let owned: Vec<Uuid> = tables
            .listings
            .values()
            .filter(|l| l.owner_id == account_id)
            .map(|l| l.id)
            .collect();
        for listing_id in owned {
            tables.drop_listing_dependents(listing_id);
            tables.listings.remove(&listing_id);
        }

        tables.accounts.remove(&account_id);
        Ok(())
    }
}
