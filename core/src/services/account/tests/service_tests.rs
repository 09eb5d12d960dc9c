//! Tests for account deletion rules and statistics.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::account::{Account, Role};
use crate::domain::entities::listing::Listing;
use crate::domain::value_objects::listing_draft::ListingDraft;
use crate::errors::{AuthError, DomainError};
use crate::repositories::{AccountRepository, InMemoryStore, ListingRepository};
use crate::services::account::AccountService;
use crate::services::coordinator::CascadeCoordinator;
use crate::services::storage::MediaStorage;

struct NullMedia;

#[async_trait]
impl MediaStorage for NullMedia {
    async fn store(&self, filename: &str, _bytes: &[u8]) -> Result<String, DomainError> {
        Ok(filename.to_string())
    }

    async fn delete(&self, _url: &str) -> Result<(), DomainError> {
        Ok(())
    }
}

type Service = AccountService<InMemoryStore, InMemoryStore, InMemoryStore, NullMedia>;

fn service(store: &Arc<InMemoryStore>) -> Service {
    let coordinator = Arc::new(CascadeCoordinator::new(
        store.clone(),
        store.clone(),
        Arc::new(NullMedia),
    ));
    AccountService::new(store.clone(), coordinator)
}

async fn seed(store: &InMemoryStore, username: &str, role: Role) -> Account {
    AccountRepository::create(
        store,
        Account::new(username, "Name", "x@example.com", "+1", "hash", role),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn account_can_delete_itself() {
    let store = Arc::new(InMemoryStore::new());
    let service = service(&store);
    let customer = seed(store.as_ref(), "cust", Role::Customer).await;

    service.delete(customer.id, customer.id).await.unwrap();
    assert!(AccountRepository::find_by_id(store.as_ref(), customer.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn admin_can_delete_others() {
    let store = Arc::new(InMemoryStore::new());
    let service = service(&store);
    let admin = seed(store.as_ref(), "admin", Role::Admin).await;
    let owner = seed(store.as_ref(), "owner", Role::Owner).await;

    let listing = Listing::new(
        owner.id,
        ListingDraft {
            title: "Flat".to_string(),
            description: "Desc".to_string(),
            address: "1 Rd".to_string(),
            area: 30.0,
            price_per_month: 600.0,
            max_tenants: None,
        },
        vec![],
    );
    let listing = ListingRepository::create(store.as_ref(), listing)
        .await
        .unwrap();

    service.delete(admin.id, owner.id).await.unwrap();

    assert!(AccountRepository::find_by_id(store.as_ref(), owner.id)
        .await
        .unwrap()
        .is_none());
    assert!(ListingRepository::find_by_id(store.as_ref(), listing.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn stranger_cannot_delete() {
    let store = Arc::new(InMemoryStore::new());
    let service = service(&store);
    let a = seed(store.as_ref(), "a", Role::Customer).await;
    let b = seed(store.as_ref(), "b", Role::Customer).await;

    let err = service.delete(a.id, b.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::NotAuthorized)));
}

#[tokio::test]
async fn admin_accounts_cannot_be_deleted() {
    let store = Arc::new(InMemoryStore::new());
    let service = service(&store);
    let admin = seed(store.as_ref(), "admin", Role::Admin).await;
    let other_admin = seed(store.as_ref(), "admin2", Role::Admin).await;

    // Not even by themselves or by another admin
    let err = service.delete(admin.id, admin.id).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::AdminDeletionForbidden)
    ));
    let err = service.delete(other_admin.id, admin.id).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::AdminDeletionForbidden)
    ));
}

#[tokio::test]
async fn disable_bumps_token_version() {
    let store = Arc::new(InMemoryStore::new());
    let service = service(&store);
    let admin = seed(store.as_ref(), "admin", Role::Admin).await;
    let customer = seed(store.as_ref(), "cust", Role::Customer).await;

    let disabled = service
        .set_enabled(admin.id, customer.id, false)
        .await
        .unwrap();
    assert!(!disabled.enabled);
    assert_eq!(disabled.token_version, customer.token_version + 1);

    let enabled = service
        .set_enabled(admin.id, customer.id, true)
        .await
        .unwrap();
    assert!(enabled.enabled);
}

#[tokio::test]
async fn disable_requires_admin_and_spares_admins() {
    let store = Arc::new(InMemoryStore::new());
    let service = service(&store);
    let admin = seed(store.as_ref(), "admin", Role::Admin).await;
    let customer = seed(store.as_ref(), "cust", Role::Customer).await;

    let err = service
        .set_enabled(customer.id, admin.id, false)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::NotAuthorized)));

    let err = service
        .set_enabled(admin.id, admin.id, false)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::NotAuthorized)));
}

#[tokio::test]
async fn active_percentage_handles_empty_and_fractions() {
    let store = Arc::new(InMemoryStore::new());
    let service = service(&store);

    assert_eq!(service.active_percentage().await.unwrap(), 0.0);

    let admin = seed(store.as_ref(), "admin", Role::Admin).await;
    seed(store.as_ref(), "c1", Role::Customer).await;
    let c2 = seed(store.as_ref(), "c2", Role::Customer).await;
    service.set_enabled(admin.id, c2.id, false).await.unwrap();

    let pct = service.active_percentage().await.unwrap();
    assert!((pct - (200.0 / 3.0)).abs() < 1e-9);
}
