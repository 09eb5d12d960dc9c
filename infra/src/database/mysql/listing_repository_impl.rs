//! MySQL implementation of the ListingRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use rh_core::domain::entities::listing::{Listing, ListingImage, ListingStatus};
use rh_core::errors::DomainError;
use rh_core::repositories::ListingRepository;

/// MySQL implementation of ListingRepository
///
/// Listing images live in their own table and are loaded alongside the
/// listing row.
pub struct MySqlListingRepository {
    pool: MySqlPool,
}

const SELECT_COLUMNS: &str = "id, owner_id, title, description, address, area, \
                              price_per_month, max_tenants, current_tenants, tenant_id, \
                              status, reviewed_by, reviewed_at, reject_reason, \
                              created_at, updated_at";

impl MySqlListingRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Listing entity (images loaded separately)
    pub(crate) fn row_to_listing(row: &sqlx::mysql::MySqlRow) -> Result<Listing, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;
        let owner_id: String = row.try_get("owner_id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get owner_id: {}", e),
        })?;
        let tenant_id: Option<String> =
            row.try_get("tenant_id").map_err(|e| DomainError::Internal {
                message: format!("Failed to get tenant_id: {}", e),
            })?;
        let status: String = row.try_get("status").map_err(|e| DomainError::Internal {
            message: format!("Failed to get status: {}", e),
        })?;
        let reviewed_by: Option<String> =
            row.try_get("reviewed_by")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get reviewed_by: {}", e),
                })?;

        Ok(Listing {
            id: parse_uuid(&id)?,
            owner_id: parse_uuid(&owner_id)?,
            title: row.try_get("title").map_err(|e| DomainError::Internal {
                message: format!("Failed to get title: {}", e),
            })?,
            description: row
                .try_get("description")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get description: {}", e),
                })?,
            address: row.try_get("address").map_err(|e| DomainError::Internal {
                message: format!("Failed to get address: {}", e),
            })?,
            area: row.try_get("area").map_err(|e| DomainError::Internal {
                message: format!("Failed to get area: {}", e),
            })?,
            price_per_month: row
                .try_get("price_per_month")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get price_per_month: {}", e),
                })?,
            max_tenants: row
                .try_get("max_tenants")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get max_tenants: {}", e),
                })?,
            current_tenants: row
                .try_get("current_tenants")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get current_tenants: {}", e),
                })?,
            tenant_id: tenant_id.as_deref().map(parse_uuid).transpose()?,
            status: ListingStatus::parse(&status).ok_or_else(|| DomainError::Internal {
                message: format!("Unknown listing status: {}", status),
            })?,
            reviewed_by: reviewed_by.as_deref().map(parse_uuid).transpose()?,
            reviewed_at: row
                .try_get::<Option<DateTime<Utc>>, _>("reviewed_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get reviewed_at: {}", e),
                })?,
            reject_reason: row
                .try_get("reject_reason")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get reject_reason: {}", e),
                })?,
            images: Vec::new(),
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

    /// Loads the images belonging to a listing
    async fn load_images(&self, listing_id: Uuid) -> Result<Vec<ListingImage>, DomainError> {
        let rows = sqlx::query("SELECT id, url FROM listing_images WHERE listing_id = ?")
            .bind(listing_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to load listing images: {}", e),
            })?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
                    message: format!("Failed to get image id: {}", e),
                })?;
                Ok(ListingImage {
                    id: parse_uuid(&id)?,
                    url: row.try_get("url").map_err(|e| DomainError::Internal {
                        message: format!("Failed to get image url: {}", e),
                    })?,
                })
            })
            .collect()
    }

    async fn hydrate(&self, mut listing: Listing) -> Result<Listing, DomainError> {
        listing.images = self.load_images(listing.id).await?;
        Ok(listing)
    }

    async fn hydrate_all(&self, rows: Vec<sqlx::mysql::MySqlRow>) -> Result<Vec<Listing>, DomainError> {
        let mut listings = Vec::with_capacity(rows.len());
        for row in &rows {
            let listing = Self::row_to_listing(row)?;
            listings.push(self.hydrate(listing).await?);
        }
        Ok(listings)
    }

    /// Replaces the image rows of a listing
    async fn store_images(&self, listing: &Listing) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM listing_images WHERE listing_id = ?")
            .bind(listing.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to clear listing images: {}", e),
            })?;

        for image in &listing.images {
            sqlx::query("INSERT INTO listing_images (id, listing_id, url) VALUES (?, ?, ?)")
                .bind(image.id.to_string())
                .bind(listing.id.to_string())
                .bind(&image.url)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to store listing image: {}", e),
                })?;
        }
        Ok(())
    }
}

pub(crate) fn parse_uuid(value: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID: {}", e),
    })
}

#[async_trait]
impl ListingRepository for MySqlListingRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, DomainError> {
        let query = format!("SELECT {} FROM listings WHERE id = ? LIMIT 1", SELECT_COLUMNS);

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find listing by id: {}", e),
            })?;

        match result {
            Some(row) => {
                let listing = Self::row_to_listing(&row)?;
                Ok(Some(self.hydrate(listing).await?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, DomainError> {
        let query = format!(
            "SELECT {} FROM listings WHERE owner_id = ? ORDER BY created_at DESC",
            SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(owner_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find listings by owner: {}", e),
            })?;

        self.hydrate_all(rows).await
    }

    async fn find_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, DomainError> {
        let query = format!(
            "SELECT {} FROM listings WHERE status = ? ORDER BY created_at ASC",
            SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find listings by status: {}", e),
            })?;

        self.hydrate_all(rows).await
    }

    async fn create(&self, listing: Listing) -> Result<Listing, DomainError> {
        let query = r#"
            INSERT INTO listings (
                id, owner_id, title, description, address, area,
                price_per_month, max_tenants, current_tenants, tenant_id,
                status, reviewed_by, reviewed_at, reject_reason,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(listing.id.to_string())
            .bind(listing.owner_id.to_string())
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(&listing.address)
            .bind(listing.area)
            .bind(listing.price_per_month)
            .bind(listing.max_tenants)
            .bind(listing.current_tenants)
            .bind(listing.tenant_id.map(|id| id.to_string()))
            .bind(listing.status.as_str())
            .bind(listing.reviewed_by.map(|id| id.to_string()))
            .bind(listing.reviewed_at)
            .bind(&listing.reject_reason)
            .bind(listing.created_at)
            .bind(listing.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to create listing: {}", e),
            })?;

        self.store_images(&listing).await?;
        Ok(listing)
    }

    async fn update(&self, listing: Listing) -> Result<Listing, DomainError> {
        let query = r#"
            UPDATE listings
            SET title = ?, description = ?, address = ?, area = ?,
                price_per_month = ?, max_tenants = ?, current_tenants = ?,
                tenant_id = ?, status = ?, reviewed_by = ?, reviewed_at = ?,
                reject_reason = ?, updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(&listing.address)
            .bind(listing.area)
            .bind(listing.price_per_month)
            .bind(listing.max_tenants)
            .bind(listing.current_tenants)
            .bind(listing.tenant_id.map(|id| id.to_string()))
            .bind(listing.status.as_str())
            .bind(listing.reviewed_by.map(|id| id.to_string()))
            .bind(listing.reviewed_at)
            .bind(&listing.reject_reason)
            .bind(listing.updated_at)
            .bind(listing.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update listing: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Listing"));
        }

        self.store_images(&listing).await?;
        Ok(listing)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM listings")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to count listings: {}", e),
            })?;

        let count: i64 = row.try_get("count").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count: {}", e),
        })?;
        Ok(count as u64)
    }

    async fn count_by_status(&self, status: ListingStatus) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM listings WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to count listings by status: {}", e),
            })?;

        let count: i64 = row.try_get("count").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count: {}", e),
        })?;
        Ok(count as u64)
    }
}
