//! Notification delivery port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::DomainError;

/// Content of a notification about to be delivered
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub recipient_id: Uuid,
    pub title: String,
    pub body: String,
    pub listing_id: Option<Uuid>,
}

impl NotificationDraft {
    pub fn new(
        recipient_id: Uuid,
        title: impl Into<String>,
        body: impl Into<String>,
        listing_id: Option<Uuid>,
    ) -> Self {
        Self {
            recipient_id,
            title: title.into(),
            body: body.into(),
            listing_id,
        }
    }
}

/// Port for delivering notifications
///
/// Lifecycle services fan out through this trait so they stay ignorant
/// of how notifications reach the recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, draft: NotificationDraft) -> Result<(), DomainError>;
}
