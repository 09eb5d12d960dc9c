//! Notification inbox service.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::notification::Notification;
use crate::errors::{AuthError, DomainError};
use crate::repositories::NotificationRepository;

use super::traits::{NotificationDraft, Notifier};

/// Service managing each account's notification inbox
pub struct NotificationService<N: NotificationRepository> {
    notifications: Arc<N>,
}

impl<N: NotificationRepository> NotificationService<N> {
    pub fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }

    /// Returns an account's notifications, newest first
    pub async fn inbox(&self, account_id: Uuid) -> Result<Vec<Notification>, DomainError> {
        self.notifications.find_by_recipient(account_id).await
    }

    /// Count of unread notifications for an account
    pub async fn unread_count(&self, account_id: Uuid) -> Result<u64, DomainError> {
        self.notifications.count_unread(account_id).await
    }

    /// Marks a notification as read
    ///
    /// Only the recipient may mark their own notifications.
    ///
    /// # Errors
    /// * `NotFound` - No such notification
    /// * `AuthError::NotAuthorized` - Caller is not the recipient
    pub async fn mark_read(
        &self,
        actor_id: Uuid,
        notification_id: Uuid,
    ) -> Result<Notification, DomainError> {
        let mut notification = self
            .notifications
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Notification"))?;

        if notification.recipient_id != actor_id {
            return Err(AuthError::NotAuthorized.into());
        }

        notification.mark_read();
        self.notifications.update(notification).await
    }
}

#[async_trait]
impl<N: NotificationRepository> Notifier for NotificationService<N> {
    async fn notify(&self, draft: NotificationDraft) -> Result<(), DomainError> {
        let notification = Notification::new(
            draft.recipient_id,
            draft.title,
            draft.body,
            draft.listing_id,
        );
        self.notifications.create(notification).await?;
        Ok(())
    }
}
