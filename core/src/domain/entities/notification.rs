//! Notification entity: a message delivered to an account's inbox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An in-app notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    /// Account the notification is addressed to
    pub recipient_id: Uuid,
    pub title: String,
    pub body: String,
    /// Listing this notification is about, when there is one
    pub listing_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        recipient_id: Uuid,
        title: impl Into<String>,
        body: impl Into<String>,
        listing_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_id,
            title: title.into(),
            body: body.into(),
            listing_id,
            read: false,
            created_at: Utc::now(),
        }
    }

    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_notification_is_unread() {
        let mut n = Notification::new(Uuid::new_v4(), "Review result", "Approved", None);
        assert!(!n.read);
        n.mark_read();
        assert!(n.read);
    }
}
