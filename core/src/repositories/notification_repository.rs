//! Notification repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::notification::Notification;
use crate::errors::DomainError;

/// Repository trait for Notification entity persistence operations
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Find a notification by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, DomainError>;

    /// Find all notifications addressed to an account, newest first
    async fn find_by_recipient(
        &self,
        recipient_id: Uuid,
    ) -> Result<Vec<Notification>, DomainError>;

    /// Count unread notifications for an account
    async fn count_unread(&self, recipient_id: Uuid) -> Result<u64, DomainError>;

    /// Create a new notification
    async fn create(&self, notification: Notification) -> Result<Notification, DomainError>;

    /// Update an existing notification
    async fn update(&self, notification: Notification) -> Result<Notification, DomainError>;
}
