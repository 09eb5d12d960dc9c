//! Local filesystem media storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use rh_core::errors::DomainError;
use rh_core::services::MediaStorage;
use rh_shared::config::StorageConfig;

/// Media store backed by a directory on the local filesystem
///
/// Stored URLs look like `/media/<relative path>`; deletion strips the
/// public prefix and removes the file under the media root. A URL that
/// does not carry the prefix, or a file that is already gone, is treated
/// as deleted.
pub struct LocalMediaStorage {
    media_root: PathBuf,
    public_prefix: String,
}

impl LocalMediaStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            media_root: PathBuf::from(&config.media_root),
            public_prefix: config.public_prefix.clone(),
        }
    }

    /// Maps a stored URL to a path under the media root
    ///
    /// Returns `None` for URLs outside the public prefix or paths that
    /// try to escape the root with `..` segments.
    fn resolve(&self, url: &str) -> Option<PathBuf> {
        let relative = url.strip_prefix(&self.public_prefix)?;
        let relative = Path::new(relative);
        if relative
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return None;
        }
        Some(self.media_root.join(relative))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, DomainError> {
        // Prefix with a fresh id so uploads cannot collide or overwrite.
        let name = format!("{}-{}", uuid::Uuid::new_v4(), filename);
        let path = self.media_root.join(&name);

        tokio::fs::create_dir_all(&self.media_root)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to create media root: {}", e),
            })?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to store media file {}: {}", path.display(), e),
            })?;

        Ok(format!("{}{}", self.public_prefix, name))
    }

    async fn delete(&self, url: &str) -> Result<(), DomainError> {
        let Some(path) = self.resolve(url) else {
            debug!(url = %url, "Media URL outside the local store, skipping");
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Internal {
                message: format!("Failed to delete media file {}: {}", path.display(), e),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_at(root: &Path) -> LocalMediaStorage {
        LocalMediaStorage::new(&StorageConfig {
            media_root: root.to_string_lossy().into_owned(),
            public_prefix: String::from("/media/"),
        })
    }

    #[tokio::test]
    async fn store_then_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_at(dir.path());

        let url = storage.store("photo.jpg", b"bytes").await.unwrap();
        assert!(url.starts_with("/media/"));
        assert!(url.ends_with("photo.jpg"));

        storage.delete(&url).await.unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn delete_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_at(dir.path());
        let file = dir.path().join("photo.jpg");
        tokio::fs::write(&file, b"bytes").await.unwrap();

        storage.delete("/media/photo.jpg").await.unwrap();

        assert!(!file.exists());
    }

    #[tokio::test]
    async fn delete_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_at(dir.path());

        storage.delete("/media/gone.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn delete_skips_urls_outside_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_at(dir.path());

        storage
            .delete("https://cdn.example.com/photo.jpg")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_refuses_path_escapes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("media");
        tokio::fs::create_dir(&root).await.unwrap();
        let storage = storage_at(&root);
        let outside = dir.path().join("secret.txt");
        tokio::fs::write(&outside, b"keep").await.unwrap();

        storage.delete("/media/../secret.txt").await.unwrap();

        assert!(outside.exists());
    }
}
