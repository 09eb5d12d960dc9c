//! Mocks for listing service tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::DomainError;
use crate::services::notification::{NotificationDraft, Notifier};
use crate::services::storage::MediaStorage;

/// Notifier that records every delivered draft
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<NotificationDraft>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titles(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.title.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, draft: NotificationDraft) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(draft);
        Ok(())
    }
}

/// Media storage that records deletions
#[derive(Default)]
pub struct RecordingMedia {
    pub deleted: Mutex<Vec<String>>,
}

impl RecordingMedia {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaStorage for RecordingMedia {
    async fn store(&self, filename: &str, _bytes: &[u8]) -> Result<String, DomainError> {
        Ok(format!("https://media/{filename}"))
    }

    async fn delete(&self, url: &str) -> Result<(), DomainError> {
        self.deleted.lock().unwrap().push(url.to_string());
        Ok(())
    }
}
