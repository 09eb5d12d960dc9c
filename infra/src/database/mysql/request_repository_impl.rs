//! MySQL implementation of the RequestRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use rh_core::domain::entities::rental_request::{RentalRequest, RequestStatus};
use rh_core::errors::{DomainError, ListingError, RequestError};
use rh_core::repositories::RequestRepository;

use super::listing_repository_impl::parse_uuid;

/// MySQL implementation of RequestRepository
///
/// Creation runs inside a transaction that locks the listing row,
/// re-checking the duplicate and capacity rules so two racing customers
/// cannot both slip through. The listing's current_tenants column tracks
/// the number of live requests and is maintained here.
pub struct MySqlRequestRepository {
    pool: MySqlPool,
}

const SELECT_COLUMNS: &str =
    "id, listing_id, customer_id, status, message, created_at, updated_at";

impl MySqlRequestRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RentalRequest entity
    pub(crate) fn row_to_request(row: &sqlx::mysql::MySqlRow) -> Result<RentalRequest, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;
        let listing_id: String = row
            .try_get("listing_id")
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to get listing_id: {}", e),
            })?;
        let customer_id: String = row
            .try_get("customer_id")
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to get customer_id: {}", e),
            })?;
        let status: String = row.try_get("status").map_err(|e| DomainError::Internal {
            message: format!("Failed to get status: {}", e),
        })?;

        Ok(RentalRequest {
            id: parse_uuid(&id)?,
            listing_id: parse_uuid(&listing_id)?,
            customer_id: parse_uuid(&customer_id)?,
            status: RequestStatus::parse(&status).ok_or_else(|| DomainError::Internal {
                message: format!("Unknown request status: {}", status),
            })?,
            message: row.try_get("message").map_err(|e| DomainError::Internal {
                message: format!("Failed to get message: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get updated_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl RequestRepository for MySqlRequestRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RentalRequest>, DomainError> {
        let query = format!(
            "SELECT {} FROM rental_requests WHERE id = ? LIMIT 1",
            SELECT_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find request by id: {}", e),
            })?;

        result.map(|row| Self::row_to_request(&row)).transpose()
    }

    async fn find_by_listing(&self, listing_id: Uuid) -> Result<Vec<RentalRequest>, DomainError> {
        let query = format!(
            "SELECT {} FROM rental_requests WHERE listing_id = ? ORDER BY created_at ASC",
            SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(listing_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find requests by listing: {}", e),
            })?;

        rows.iter().map(Self::row_to_request).collect()
    }

    async fn find_by_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<RentalRequest>, DomainError> {
        let query = format!(
            "SELECT {} FROM rental_requests WHERE customer_id = ? ORDER BY created_at DESC",
            SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(customer_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find requests by customer: {}", e),
            })?;

        rows.iter().map(Self::row_to_request).collect()
    }

    async fn count_live_by_listing(&self, listing_id: Uuid) -> Result<u64, DomainError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM rental_requests \
             WHERE listing_id = ? AND status IN ('PENDING', 'SELECTED')",
        )
        .bind(listing_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to count live requests: {}", e),
        })?;

        let count: i64 = row.try_get("count").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count: {}", e),
        })?;
        Ok(count as u64)
    }

    async fn exists_live_by_listing_and_customer(
        &self,
        listing_id: Uuid,
        customer_id: Uuid,
    ) -> Result<bool, DomainError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM rental_requests \
             WHERE listing_id = ? AND customer_id = ? AND status IN ('PENDING', 'SELECTED')",
        )
        .bind(listing_id.to_string())
        .bind(customer_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to check for a live request: {}", e),
        })?;

        let count: i64 = row.try_get("count").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count: {}", e),
        })?;
        Ok(count > 0)
    }

    async fn create(&self, request: RentalRequest) -> Result<RentalRequest, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        // Lock the listing row so the duplicate and capacity checks
        // cannot race with another creation.
        let listing_row = sqlx::query(
            "SELECT status, max_tenants, current_tenants FROM listings WHERE id = ? FOR UPDATE",
        )
        .bind(request.listing_id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to lock listing: {}", e),
        })?
        .ok_or_else(|| DomainError::not_found("Listing"))?;

        let status: String = listing_row
            .try_get("status")
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to get status: {}", e),
            })?;
        if status != "APPROVED" {
            return Err(ListingError::InvalidStatus { action: "request" }.into());
        }

        let max_tenants: u32 = listing_row
            .try_get("max_tenants")
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to get max_tenants: {}", e),
            })?;

        let dup_row = sqlx::query(
            "SELECT COUNT(*) as count FROM rental_requests \
             WHERE listing_id = ? AND customer_id = ? AND status IN ('PENDING', 'SELECTED')",
        )
        .bind(request.listing_id.to_string())
        .bind(request.customer_id.to_string())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to check for a live request: {}", e),
        })?;
        let duplicates: i64 = dup_row.try_get("count").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count: {}", e),
        })?;
        if duplicates > 0 {
            return Err(RequestError::Duplicate.into());
        }

        let live_row = sqlx::query(
            "SELECT COUNT(*) as count FROM rental_requests \
             WHERE listing_id = ? AND status IN ('PENDING', 'SELECTED')",
        )
        .bind(request.listing_id.to_string())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to count live requests: {}", e),
        })?;
        let live: i64 = live_row.try_get("count").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count: {}", e),
        })?;
        if live as u32 >= max_tenants {
            return Err(RequestError::LimitExceeded { max: max_tenants }.into());
        }

        sqlx::query(
            "INSERT INTO rental_requests \
             (id, listing_id, customer_id, status, message, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.id.to_string())
        .bind(request.listing_id.to_string())
        .bind(request.customer_id.to_string())
        .bind(request.status.as_str())
        .bind(&request.message)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to create request: {}", e),
        })?;

        sqlx::query("UPDATE listings SET current_tenants = ? WHERE id = ?")
            .bind(live as u32 + 1)
            .bind(request.listing_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update tenant count: {}", e),
            })?;

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit transaction: {}", e),
        })?;

        Ok(request)
    }

    async fn update(&self, request: RentalRequest) -> Result<RentalRequest, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        let result = sqlx::query(
            "UPDATE rental_requests SET status = ?, message = ?, updated_at = ? WHERE id = ?",
        )
        .bind(request.status.as_str())
        .bind(&request.message)
        .bind(request.updated_at)
        .bind(request.id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to update request: {}", e),
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Rental request"));
        }

        refresh_tenant_count(&mut tx, request.listing_id).await?;

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit transaction: {}", e),
        })?;

        Ok(request)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        let listing_id: Option<String> =
            sqlx::query("SELECT listing_id FROM rental_requests WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to find request: {}", e),
                })?
                .map(|row| {
                    row.try_get("listing_id").map_err(|e| DomainError::Internal {
                        message: format!("Failed to get listing_id: {}", e),
                    })
                })
                .transpose()?;

        let Some(listing_id) = listing_id else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM rental_requests WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete request: {}", e),
            })?;

        refresh_tenant_count(&mut tx, parse_uuid(&listing_id)?).await?;

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit transaction: {}", e),
        })?;

        Ok(true)
    }

    async fn count_by_status(&self, status: Option<RequestStatus>) -> Result<u64, DomainError> {
        let row = match status {
            Some(status) => {
                sqlx::query("SELECT COUNT(*) as count FROM rental_requests WHERE status = ?")
                    .bind(status.as_str())
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT COUNT(*) as count FROM rental_requests")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to count requests: {}", e),
        })?;

        let count: i64 = row.try_get("count").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count: {}", e),
        })?;
        Ok(count as u64)
    }
}

/// Recomputes a listing's current_tenants from its live requests
pub(crate) async fn refresh_tenant_count(
    tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
    listing_id: Uuid,
) -> Result<(), DomainError> {
    sqlx::query(
        "UPDATE listings SET current_tenants = (\
             SELECT COUNT(*) FROM rental_requests \
             WHERE listing_id = ? AND status IN ('PENDING', 'SELECTED')\
         ) WHERE id = ?",
    )
    .bind(listing_id.to_string())
    .bind(listing_id.to_string())
    .execute(&mut **tx)
    .await
    .map_err(|e| DomainError::Internal {
        message: format!("Failed to refresh tenant count: {}", e),
    })?;
    Ok(())
}
