//! Media storage port.

use async_trait::async_trait;

use crate::errors::DomainError;

/// Port for the external media store holding listing images
///
/// Deletions here are best-effort from the caller's point of view: a
/// failed media delete must never block the database-side cascade.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Stores an object and returns the URL it is served under
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, DomainError>;

    /// Deletes the object behind a stored URL
    async fn delete(&self, url: &str) -> Result<(), DomainError>;
}
