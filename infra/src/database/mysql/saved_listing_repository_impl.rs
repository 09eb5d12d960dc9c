//! MySQL implementation of the SavedListingRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use rh_core::domain::entities::saved_listing::SavedListing;
use rh_core::errors::DomainError;
use rh_core::repositories::SavedListingRepository;

use super::listing_repository_impl::parse_uuid;

/// MySQL implementation of SavedListingRepository
pub struct MySqlSavedListingRepository {
    pool: MySqlPool,
}

impl MySqlSavedListingRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_saved(row: &sqlx::mysql::MySqlRow) -> Result<SavedListing, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;
        let customer_id: String = row
            .try_get("customer_id")
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to get customer_id: {}", e),
            })?;
        let listing_id: String = row
            .try_get("listing_id")
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to get listing_id: {}", e),
            })?;

        Ok(SavedListing {
            id: parse_uuid(&id)?,
            customer_id: parse_uuid(&customer_id)?,
            listing_id: parse_uuid(&listing_id)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl SavedListingRepository for MySqlSavedListingRepository {
    async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<SavedListing>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, customer_id, listing_id, created_at FROM saved_listings \
             WHERE customer_id = ? ORDER BY created_at DESC",
        )
        .bind(customer_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to find saved listings: {}", e),
        })?;

        rows.iter().map(Self::row_to_saved).collect()
    }

    async fn exists(&self, customer_id: Uuid, listing_id: Uuid) -> Result<bool, DomainError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM saved_listings \
             WHERE customer_id = ? AND listing_id = ?",
        )
        .bind(customer_id.to_string())
        .bind(listing_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to check for a bookmark: {}", e),
        })?;

        let count: i64 = row.try_get("count").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count: {}", e),
        })?;
        Ok(count > 0)
    }

    async fn create(&self, saved: SavedListing) -> Result<SavedListing, DomainError> {
        sqlx::query(
            "INSERT INTO saved_listings (id, customer_id, listing_id, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(saved.id.to_string())
        .bind(saved.customer_id.to_string())
        .bind(saved.listing_id.to_string())
        .bind(saved.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DomainError::Validation {
                    message: "Listing already bookmarked".to_string(),
                }
            }
            _ => DomainError::Internal {
                message: format!("Failed to create bookmark: {}", e),
            },
        })?;

        Ok(saved)
    }

    async fn delete(&self, customer_id: Uuid, listing_id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "DELETE FROM saved_listings WHERE customer_id = ? AND listing_id = ?",
        )
        .bind(customer_id.to_string())
        .bind(listing_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to delete bookmark: {}", e),
        })?;

        Ok(result.rows_affected() > 0)
    }
}
