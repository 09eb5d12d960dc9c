//! Tests for the notification inbox service.

use std::sync::Arc;

use uuid::Uuid;

use crate::errors::{AuthError, DomainError};
use crate::repositories::InMemoryStore;
use crate::services::notification::{NotificationDraft, NotificationService, Notifier};

fn service() -> NotificationService<InMemoryStore> {
    NotificationService::new(Arc::new(InMemoryStore::new()))
}

#[tokio::test]
async fn notify_lands_in_recipient_inbox() {
    let service = service();
    let recipient = Uuid::new_v4();

    service
        .notify(NotificationDraft::new(recipient, "Review result", "Approved", None))
        .await
        .unwrap();

    let inbox = service.inbox(recipient).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].title, "Review result");
    assert!(!inbox[0].read);
    assert_eq!(service.unread_count(recipient).await.unwrap(), 1);
}

#[tokio::test]
async fn mark_read_clears_unread_count() {
    let service = service();
    let recipient = Uuid::new_v4();

    service
        .notify(NotificationDraft::new(recipient, "Hello", "body", None))
        .await
        .unwrap();
    let inbox = service.inbox(recipient).await.unwrap();

    let updated = service.mark_read(recipient, inbox[0].id).await.unwrap();
    assert!(updated.read);
    assert_eq!(service.unread_count(recipient).await.unwrap(), 0);
}

#[tokio::test]
async fn mark_read_rejects_other_accounts() {
    let service = service();
    let recipient = Uuid::new_v4();

    service
        .notify(NotificationDraft::new(recipient, "Hello", "body", None))
        .await
        .unwrap();
    let inbox = service.inbox(recipient).await.unwrap();

    let err = service
        .mark_read(Uuid::new_v4(), inbox[0].id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::NotAuthorized)));
}

#[tokio::test]
async fn mark_read_missing_notification() {
    let service = service();
    let err = service
        .mark_read(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
