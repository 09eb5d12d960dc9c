//! Mocks for coordinator tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::DomainError;
use crate::services::storage::MediaStorage;

/// Media storage that records deletions and can be told to fail
pub struct RecordingMedia {
    pub deleted: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingMedia {
    pub fn new() -> Self {
        Self {
            deleted: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            deleted: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl MediaStorage for RecordingMedia {
    async fn store(&self, filename: &str, _bytes: &[u8]) -> Result<String, DomainError> {
        Ok(format!("https://media/{filename}"))
    }

    async fn delete(&self, url: &str) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::Internal {
                message: "media store unavailable".to_string(),
            });
        }
        self.deleted.lock().unwrap().push(url.to_string());
        Ok(())
    }
}
