//! Mocks for rental request service tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::DomainError;
use crate::services::notification::{NotificationDraft, Notifier};

/// Notifier that records every delivered draft
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<NotificationDraft>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, draft: NotificationDraft) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(draft);
        Ok(())
    }
}
