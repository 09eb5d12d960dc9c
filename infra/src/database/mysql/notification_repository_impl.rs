//! MySQL implementation of the NotificationRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use rh_core::domain::entities::notification::Notification;
use rh_core::errors::DomainError;
use rh_core::repositories::NotificationRepository;

use super::listing_repository_impl::parse_uuid;

/// MySQL implementation of NotificationRepository
pub struct MySqlNotificationRepository {
    pool: MySqlPool,
}

const SELECT_COLUMNS: &str = "id, recipient_id, title, body, listing_id, `read`, created_at";

impl MySqlNotificationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Notification entity
    fn row_to_notification(row: &sqlx::mysql::MySqlRow) -> Result<Notification, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;
        let recipient_id: String =
            row.try_get("recipient_id")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get recipient_id: {}", e),
                })?;
        let listing_id: Option<String> =
            row.try_get("listing_id").map_err(|e| DomainError::Internal {
                message: format!("Failed to get listing_id: {}", e),
            })?;

        Ok(Notification {
            id: parse_uuid(&id)?,
            recipient_id: parse_uuid(&recipient_id)?,
            title: row.try_get("title").map_err(|e| DomainError::Internal {
                message: format!("Failed to get title: {}", e),
            })?,
            body: row.try_get("body").map_err(|e| DomainError::Internal {
                message: format!("Failed to get body: {}", e),
            })?,
            listing_id: listing_id.as_deref().map(parse_uuid).transpose()?,
            read: row.try_get("read").map_err(|e| DomainError::Internal {
                message: format!("Failed to get read flag: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl NotificationRepository for MySqlNotificationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, DomainError> {
        let query = format!(
            "SELECT {} FROM notifications WHERE id = ? LIMIT 1",
            SELECT_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find notification by id: {}", e),
            })?;

        result.map(|row| Self::row_to_notification(&row)).transpose()
    }

    async fn find_by_recipient(
        &self,
        recipient_id: Uuid,
    ) -> Result<Vec<Notification>, DomainError> {
        let query = format!(
            "SELECT {} FROM notifications WHERE recipient_id = ? ORDER BY created_at DESC",
            SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(recipient_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find notifications by recipient: {}", e),
            })?;

        rows.iter().map(Self::row_to_notification).collect()
    }

    async fn count_unread(&self, recipient_id: Uuid) -> Result<u64, DomainError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM notifications WHERE recipient_id = ? AND `read` = FALSE",
        )
        .bind(recipient_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to count unread notifications: {}", e),
        })?;

        let count: i64 = row.try_get("count").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count: {}", e),
        })?;
        Ok(count as u64)
    }

    async fn create(&self, notification: Notification) -> Result<Notification, DomainError> {
        sqlx::query(
            "INSERT INTO notifications \
             (id, recipient_id, title, body, listing_id, `read`, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(notification.id.to_string())
        .bind(notification.recipient_id.to_string())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(notification.listing_id.map(|id| id.to_string()))
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to create notification: {}", e),
        })?;

        Ok(notification)
    }

    async fn update(&self, notification: Notification) -> Result<Notification, DomainError> {
        let result = sqlx::query("UPDATE notifications SET `read` = ? WHERE id = ?")
            .bind(notification.read)
            .bind(notification.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update notification: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Notification"));
        }

        Ok(notification)
    }
}
