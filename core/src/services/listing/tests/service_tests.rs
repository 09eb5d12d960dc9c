//! Tests for the listing lifecycle, including the review race.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::account::{Account, Role};
use crate::domain::entities::listing::{Listing, ListingStatus};
use crate::domain::entities::rental_request::RentalRequest;
use crate::domain::value_objects::listing_draft::ListingDraft;
use crate::errors::{AuthError, DomainError, ListingError};
use crate::repositories::{
    AccountRepository, InMemoryStore, ListingRepository, RequestRepository,
};
use crate::services::coordinator::CascadeCoordinator;
use crate::services::listing::{ListingService, ReviewLocks};

use super::mocks::{RecordingMedia, RecordingNotifier};

type Service =
    ListingService<InMemoryStore, InMemoryStore, InMemoryStore, RecordingMedia, RecordingNotifier>;

struct Fixture {
    service: Arc<Service>,
    store: Arc<InMemoryStore>,
    notifier: Arc<RecordingNotifier>,
    media: Arc<RecordingMedia>,
    locks: ReviewLocks,
    owner: Account,
    admin: Account,
}

async fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let media = Arc::new(RecordingMedia::new());
    let locks = ReviewLocks::new();
    let coordinator = Arc::new(CascadeCoordinator::new(
        store.clone(),
        store.clone(),
        media.clone(),
    ));
    let service = Arc::new(ListingService::new(
        store.clone(),
        store.clone(),
        coordinator,
        notifier.clone(),
        locks.clone(),
    ));

    let owner = AccountRepository::create(
        store.as_ref(),
        Account::new("owner", "Owner", "o@example.com", "+1", "hash", Role::Owner),
    )
    .await
    .unwrap();
    let admin = AccountRepository::create(
        store.as_ref(),
        Account::new("admin", "Admin", "a@example.com", "+2", "hash", Role::Admin),
    )
    .await
    .unwrap();

    Fixture {
        service,
        store,
        notifier,
        media,
        locks,
        owner,
        admin,
    }
}

fn draft() -> ListingDraft {
    ListingDraft {
        title: "Riverside flat".to_string(),
        description: "Two bedrooms".to_string(),
        address: "4 Quay St".to_string(),
        area: 65.0,
        price_per_month: 1100.0,
        max_tenants: Some(3),
    }
}

async fn created_listing(fx: &Fixture) -> Listing {
    fx.service
        .create(fx.owner.id, draft(), vec!["https://media/x.jpg".into()])
        .await
        .unwrap()
}

#[tokio::test]
async fn create_notifies_owner_and_admins() {
    let fx = fixture().await;
    let listing = created_listing(&fx).await;

    assert_eq!(listing.status, ListingStatus::PendingReview);
    let sent = fx.notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].recipient_id, fx.owner.id);
    assert_eq!(sent[1].recipient_id, fx.admin.id);
    assert_eq!(sent[1].listing_id, Some(listing.id));
}

#[tokio::test]
async fn create_requires_owner_role() {
    let fx = fixture().await;
    let err = fx
        .service
        .create(fx.admin.id, draft(), vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::NotAuthorized)));
}

#[tokio::test]
async fn review_approves_and_notifies_owner() {
    let fx = fixture().await;
    let listing = created_listing(&fx).await;

    let reviewed = fx
        .service
        .review(fx.admin.id, listing.id, true, None)
        .await
        .unwrap();

    assert_eq!(reviewed.status, ListingStatus::Approved);
    assert_eq!(reviewed.reviewed_by, Some(fx.admin.id));
    assert!(fx
        .notifier
        .titles()
        .contains(&"Listing approved".to_string()));
}

#[tokio::test]
async fn review_requires_admin_role() {
    let fx = fixture().await;
    let listing = created_listing(&fx).await;

    let err = fx
        .service
        .review(fx.owner.id, listing.id, true, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::NotAuthorized)));
}

#[tokio::test]
async fn second_review_reports_first_decision() {
    let fx = fixture().await;
    let listing = created_listing(&fx).await;

    fx.service
        .review(fx.admin.id, listing.id, true, None)
        .await
        .unwrap();

    let second_admin = AccountRepository::create(
        fx.store.as_ref(),
        Account::new("admin2", "Admin Two", "a2@example.com", "+3", "hash", Role::Admin),
    )
    .await
    .unwrap();
    let err = fx
        .service
        .review(second_admin.id, listing.id, false, None)
        .await
        .unwrap_err();

    match err {
        DomainError::Listing(ListingError::AlreadyReviewed { reviewed_by, .. }) => {
            assert_eq!(reviewed_by, fx.admin.id);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn review_locked_while_another_is_in_flight() {
    let fx = fixture().await;
    let listing = created_listing(&fx).await;

    let _guard = fx.locks.try_acquire(listing.id).unwrap();
    let err = fx
        .service
        .review(fx.admin.id, listing.id, true, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Listing(ListingError::Locked)));
}

#[tokio::test]
async fn concurrent_reviews_decide_exactly_once() {
    let fx = fixture().await;
    let listing = created_listing(&fx).await;

    let second_admin = AccountRepository::create(
        fx.store.as_ref(),
        Account::new("admin2", "Admin Two", "a2@example.com", "+3", "hash", Role::Admin),
    )
    .await
    .unwrap();

    let a = {
        let service = fx.service.clone();
        let admin = fx.admin.id;
        tokio::spawn(async move { service.review(admin, listing.id, true, None).await })
    };
    let b = {
        let service = fx.service.clone();
        let admin = second_admin.id;
        tokio::spawn(async move { service.review(admin, listing.id, false, None).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);

    let stored = ListingRepository::find_by_id(fx.store.as_ref(), listing.id)
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(
        stored.status,
        ListingStatus::Approved | ListingStatus::Rejected
    ));
}

#[tokio::test]
async fn edit_of_approved_listing_clears_dependents_and_resubmits() {
    let fx = fixture().await;
    let listing = created_listing(&fx).await;
    fx.service
        .review(fx.admin.id, listing.id, true, None)
        .await
        .unwrap();

    let customer = AccountRepository::create(
        fx.store.as_ref(),
        Account::new("cust", "Customer", "c@example.com", "+4", "hash", Role::Customer),
    )
    .await
    .unwrap();
    RequestRepository::create(
        fx.store.as_ref(),
        RentalRequest::new(listing.id, customer.id, None),
    )
    .await
    .unwrap();

    let mut new_draft = draft();
    new_draft.title = "Riverside flat, renovated".to_string();
    let edited = fx
        .service
        .edit(fx.owner.id, listing.id, new_draft, vec![])
        .await
        .unwrap();

    assert_eq!(edited.status, ListingStatus::PendingReview);
    assert!(edited.reviewed_by.is_none());
    assert_eq!(edited.current_tenants, 0);
    // The replaced images were removed from the media store
    assert_eq!(
        fx.media.deleted.lock().unwrap().as_slice(),
        ["https://media/x.jpg"]
    );
    assert!(
        RequestRepository::find_by_listing(fx.store.as_ref(), listing.id)
            .await
            .unwrap()
            .is_empty()
    );
    // Admins were notified again about the resubmission
    assert_eq!(
        fx.notifier
            .titles()
            .iter()
            .filter(|t| *t == "Listing awaiting review")
            .count(),
        2
    );
}

#[tokio::test]
async fn edit_rejected_for_rented_listing() {
    let fx = fixture().await;
    let listing = created_listing(&fx).await;
    fx.service
        .review(fx.admin.id, listing.id, true, None)
        .await
        .unwrap();

    let mut stored = ListingRepository::find_by_id(fx.store.as_ref(), listing.id)
        .await
        .unwrap()
        .unwrap();
    stored.mark_rented(Uuid::new_v4()).unwrap();
    ListingRepository::update(fx.store.as_ref(), stored)
        .await
        .unwrap();

    let err = fx
        .service
        .edit(fx.owner.id, listing.id, draft(), vec![])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Listing(ListingError::InvalidStatus { action: "edit" })
    ));
}

#[tokio::test]
async fn edit_requires_ownership() {
    let fx = fixture().await;
    let listing = created_listing(&fx).await;

    let err = fx
        .service
        .edit(fx.admin.id, listing.id, draft(), vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::NotAuthorized)));
}

#[tokio::test]
async fn delete_allowed_for_owner_and_admin_only() {
    let fx = fixture().await;
    let listing = created_listing(&fx).await;

    let customer = AccountRepository::create(
        fx.store.as_ref(),
        Account::new("cust", "Customer", "c@example.com", "+4", "hash", Role::Customer),
    )
    .await
    .unwrap();
    let err = fx
        .service
        .delete(customer.id, listing.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::NotAuthorized)));

    fx.service.delete(fx.owner.id, listing.id).await.unwrap();
    assert!(
        ListingRepository::find_by_id(fx.store.as_ref(), listing.id)
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(
        fx.media.deleted.lock().unwrap().as_slice(),
        ["https://media/x.jpg"]
    );
}

#[tokio::test]
async fn review_queue_lists_pending_only() {
    let fx = fixture().await;
    let pending = created_listing(&fx).await;
    let decided = created_listing(&fx).await;
    fx.service
        .review(fx.admin.id, decided.id, false, Some("incomplete".into()))
        .await
        .unwrap();

    let queue = fx.service.review_queue(fx.admin.id).await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, pending.id);
}

#[tokio::test]
async fn rented_percentage_handles_empty_table() {
    let fx = fixture().await;
    assert_eq!(fx.service.rented_percentage().await.unwrap(), 0.0);

    let listing = created_listing(&fx).await;
    fx.service
        .review(fx.admin.id, listing.id, true, None)
        .await
        .unwrap();
    let mut stored = ListingRepository::find_by_id(fx.store.as_ref(), listing.id)
        .await
        .unwrap()
        .unwrap();
    stored.mark_rented(Uuid::new_v4()).unwrap();
    ListingRepository::update(fx.store.as_ref(), stored)
        .await
        .unwrap();
    let _other = created_listing(&fx).await;

    let pct = fx.service.rented_percentage().await.unwrap();
    assert!((pct - 50.0).abs() < f64::EPSILON);
}
