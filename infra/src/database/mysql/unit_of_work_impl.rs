//! MySQL implementation of the UnitOfWork trait.
//!
//! Every operation here runs inside a single transaction with
//! `SELECT ... FOR UPDATE` on the rows it is about to transition, so
//! concurrent callers serialize on the database instead of racing.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySql, MySqlPool, Row, Transaction};
use uuid::Uuid;

use rh_core::domain::entities::listing::ListingStatus;
use rh_core::domain::entities::rental_request::{RentalRequest, RequestStatus};
use rh_core::errors::{AuthError, DomainError, ListingError, RequestError};
use rh_core::repositories::{SelectionOutcome, UnitOfWork};

use super::listing_repository_impl::{parse_uuid, MySqlListingRepository};
use super::request_repository_impl::MySqlRequestRepository;

/// MySQL implementation of UnitOfWork
pub struct MySqlUnitOfWork {
    pool: MySqlPool,
}

impl MySqlUnitOfWork {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, MySql>, DomainError> {
        self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })
    }

    /// Deletes everything that references a listing, inside the caller's
    /// transaction. Does not touch the listing row itself.
    async fn drop_listing_dependents(
        tx: &mut Transaction<'_, MySql>,
        listing_id: Uuid,
    ) -> Result<(), DomainError> {
        let id = listing_id.to_string();

        sqlx::query("DELETE FROM notifications WHERE listing_id = ?")
            .bind(&id)
            .execute(&mut **tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete listing notifications: {}", e),
            })?;

        sqlx::query("DELETE FROM rental_requests WHERE listing_id = ?")
            .bind(&id)
            .execute(&mut **tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete listing requests: {}", e),
            })?;

        sqlx::query("DELETE FROM saved_listings WHERE listing_id = ?")
            .bind(&id)
            .execute(&mut **tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete listing bookmarks: {}", e),
            })?;

        Ok(())
    }

    /// Deletes a listing row together with its images and dependents.
    /// Returns false when the listing does not exist.
    async fn drop_listing_graph(
        tx: &mut Transaction<'_, MySql>,
        listing_id: Uuid,
    ) -> Result<bool, DomainError> {
        Self::drop_listing_dependents(tx, listing_id).await?;

        let id = listing_id.to_string();

        sqlx::query("DELETE FROM listing_images WHERE listing_id = ?")
            .bind(&id)
            .execute(&mut **tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete listing images: {}", e),
            })?;

        let result = sqlx::query("DELETE FROM listings WHERE id = ?")
            .bind(&id)
            .execute(&mut **tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete listing: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(tx: Transaction<'_, MySql>) -> Result<(), DomainError> {
        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit transaction: {}", e),
        })
    }
}

#[async_trait]
impl UnitOfWork for MySqlUnitOfWork {
    async fn apply_selection(
        &self,
        listing_id: Uuid,
        request_id: Uuid,
    ) -> Result<SelectionOutcome, DomainError> {
        let mut tx = self.begin().await?;
        let now = Utc::now();

        let request_row = sqlx::query(
            "SELECT id, listing_id, customer_id, status, message, created_at, updated_at \
             FROM rental_requests WHERE id = ? FOR UPDATE",
        )
        .bind(request_id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to lock request: {}", e),
        })?
        .ok_or_else(|| DomainError::not_found("Rental request"))?;

        let mut selected = MySqlRequestRepository::row_to_request(&request_row)?;

        if selected.listing_id != listing_id {
            return Err(AuthError::NotAuthorized.into());
        }
        if selected.status != RequestStatus::Pending {
            return Err(RequestError::InvalidStatus {
                status: selected.status,
            }
            .into());
        }

        let listing_row = sqlx::query(
            "SELECT id, owner_id, title, description, address, area, price_per_month, \
             max_tenants, current_tenants, tenant_id, status, reviewed_by, reviewed_at, \
             reject_reason, created_at, updated_at \
             FROM listings WHERE id = ? FOR UPDATE",
        )
        .bind(listing_id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to lock listing: {}", e),
        })?
        .ok_or_else(|| DomainError::not_found("Listing"))?;

        let mut listing = MySqlListingRepository::row_to_listing(&listing_row)?;

        if listing.status != ListingStatus::Approved {
            return Err(ListingError::InvalidStatus { action: "rented" }.into());
        }

        // Reject the pending siblings before touching the winner.
        let sibling_rows = sqlx::query(
            "SELECT id, listing_id, customer_id, status, message, created_at, updated_at \
             FROM rental_requests \
             WHERE listing_id = ? AND id != ? AND status = 'PENDING' FOR UPDATE",
        )
        .bind(listing_id.to_string())
        .bind(request_id.to_string())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to load pending siblings: {}", e),
        })?;

        let mut rejected: Vec<RentalRequest> = sibling_rows
            .iter()
            .map(MySqlRequestRepository::row_to_request)
            .collect::<Result<_, _>>()?;

        sqlx::query(
            "UPDATE rental_requests SET status = 'REJECTED', updated_at = ? \
             WHERE listing_id = ? AND id != ? AND status = 'PENDING'",
        )
        .bind(now)
        .bind(listing_id.to_string())
        .bind(request_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to reject pending siblings: {}", e),
        })?;

        for sibling in &mut rejected {
            sibling.status = RequestStatus::Rejected;
            sibling.updated_at = now;
        }

        sqlx::query("UPDATE rental_requests SET status = 'SELECTED', updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(request_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to mark request selected: {}", e),
            })?;
        selected.status = RequestStatus::Selected;
        selected.updated_at = now;

        // The winner is the only live request left on the listing.
        sqlx::query(
            "UPDATE listings SET status = 'RENTED', tenant_id = ?, current_tenants = 1, \
             updated_at = ? WHERE id = ?",
        )
        .bind(selected.customer_id.to_string())
        .bind(now)
        .bind(listing_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to mark listing rented: {}", e),
        })?;
        listing.status = ListingStatus::Rented;
        listing.tenant_id = Some(selected.customer_id);
        listing.current_tenants = 1;
        listing.updated_at = now;

        Self::commit(tx).await?;

        Ok(SelectionOutcome {
            listing,
            selected,
            rejected,
        })
    }

    async fn clear_listing_dependents(&self, listing_id: Uuid) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;

        Self::drop_listing_dependents(&mut tx, listing_id).await?;

        sqlx::query("UPDATE listings SET current_tenants = 0, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(listing_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to reset tenant count: {}", e),
            })?;

        Self::commit(tx).await
    }

    async fn delete_listing_graph(&self, listing_id: Uuid) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;

        if !Self::drop_listing_graph(&mut tx, listing_id).await? {
            return Err(DomainError::not_found("Listing"));
        }

        Self::commit(tx).await
    }

    async fn delete_account_graph(&self, account_id: Uuid) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        let id = account_id.to_string();

        sqlx::query("DELETE FROM notifications WHERE recipient_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete account notifications: {}", e),
            })?;

        // The account's outgoing requests vanish, so the listings they
        // sat on need their tenant counts recomputed afterwards.
        let touched_rows = sqlx::query(
            "SELECT DISTINCT listing_id FROM rental_requests WHERE customer_id = ?",
        )
        .bind(&id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to load affected listings: {}", e),
        })?;

        sqlx::query("DELETE FROM rental_requests WHERE customer_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete account requests: {}", e),
            })?;

        for row in &touched_rows {
            let listing_id: String =
                row.try_get("listing_id").map_err(|e| DomainError::Internal {
                    message: format!("Failed to get listing_id: {}", e),
                })?;
            sqlx::query(
                "UPDATE listings SET current_tenants = (\
                     SELECT COUNT(*) FROM rental_requests \
                     WHERE listing_id = ? AND status IN ('PENDING', 'SELECTED')\
                 ) WHERE id = ?",
            )
            .bind(&listing_id)
            .bind(&listing_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to refresh tenant count: {}", e),
            })?;
        }

        sqlx::query("DELETE FROM saved_listings WHERE customer_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete account bookmarks: {}", e),
            })?;

        let owned_rows = sqlx::query("SELECT id FROM listings WHERE owner_id = ?")
            .bind(&id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to load owned listings: {}", e),
            })?;

        for row in &owned_rows {
            let listing_id: String = row.try_get("id").map_err(|e| DomainError::Internal {
                message: format!("Failed to get id: {}", e),
            })?;
            Self::drop_listing_graph(&mut tx, parse_uuid(&listing_id)?).await?;
        }

        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete account: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Account"));
        }

        Self::commit(tx).await
    }
}
