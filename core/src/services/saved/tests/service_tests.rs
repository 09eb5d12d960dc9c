//! Tests for saving and unsaving listings.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::listing::Listing;
use crate::domain::value_objects::listing_draft::ListingDraft;
use crate::errors::DomainError;
use crate::repositories::{InMemoryStore, ListingRepository};
use crate::services::saved::SavedListingService;

type Service = SavedListingService<InMemoryStore, InMemoryStore>;

struct Fixture {
    service: Service,
    store: Arc<InMemoryStore>,
}

async fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let service = SavedListingService::new(store.clone(), store.clone());
    Fixture { service, store }
}

async fn listing(fx: &Fixture) -> Listing {
    let draft = ListingDraft {
        title: "Garden flat".to_string(),
        description: "Quiet".to_string(),
        address: "3 Elm St".to_string(),
        area: 48.0,
        price_per_month: 900.0,
        max_tenants: Some(2),
    };
    ListingRepository::create(fx.store.as_ref(), Listing::new(Uuid::new_v4(), draft, vec![]))
        .await
        .unwrap()
}

#[tokio::test]
async fn save_then_list_returns_the_bookmark() {
    let fx = fixture().await;
    let listing = listing(&fx).await;
    let customer = Uuid::new_v4();

    let saved = fx.service.save(customer, listing.id).await.unwrap();
    assert_eq!(saved.customer_id, customer);
    assert_eq!(saved.listing_id, listing.id);

    let bookmarks = fx.service.list(customer).await.unwrap();
    assert_eq!(bookmarks.len(), 1);
    assert_eq!(bookmarks[0].listing_id, listing.id);
}

#[tokio::test]
async fn save_rejects_missing_listing() {
    let fx = fixture().await;

    let err = fx
        .service
        .save(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn save_rejects_duplicate_bookmark() {
    let fx = fixture().await;
    let listing = listing(&fx).await;
    let customer = Uuid::new_v4();

    fx.service.save(customer, listing.id).await.unwrap();
    let err = fx.service.save(customer, listing.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn unsave_removes_the_bookmark() {
    let fx = fixture().await;
    let listing = listing(&fx).await;
    let customer = Uuid::new_v4();

    fx.service.save(customer, listing.id).await.unwrap();
    fx.service.unsave(customer, listing.id).await.unwrap();

    assert!(fx.service.list(customer).await.unwrap().is_empty());
}

#[tokio::test]
async fn unsave_without_bookmark_is_not_found() {
    let fx = fixture().await;
    let listing = listing(&fx).await;

    let err = fx
        .service
        .unsave(Uuid::new_v4(), listing.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
