//! MySQL implementation of the AccountRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use rh_core::domain::entities::account::{Account, Role};
use rh_core::errors::DomainError;
use rh_core::repositories::AccountRepository;

/// MySQL implementation of AccountRepository
pub struct MySqlAccountRepository {
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Account entity
    fn row_to_account(row: &sqlx::mysql::MySqlRow) -> Result<Account, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;
        let role: String = row.try_get("role").map_err(|e| DomainError::Internal {
            message: format!("Failed to get role: {}", e),
        })?;

        Ok(Account {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid account UUID: {}", e),
            })?,
            username: row.try_get("username").map_err(|e| DomainError::Internal {
                message: format!("Failed to get username: {}", e),
            })?,
            full_name: row.try_get("full_name").map_err(|e| DomainError::Internal {
                message: format!("Failed to get full_name: {}", e),
            })?,
            email: row.try_get("email").map_err(|e| DomainError::Internal {
                message: format!("Failed to get email: {}", e),
            })?,
            phone: row.try_get("phone").map_err(|e| DomainError::Internal {
                message: format!("Failed to get phone: {}", e),
            })?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get password_hash: {}", e),
                })?,
            role: Role::parse(&role).ok_or_else(|| DomainError::Internal {
                message: format!("Unknown role: {}", role),
            })?,
            token_version: row
                .try_get("token_version")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get token_version: {}", e),
                })?,
            enabled: row.try_get("enabled").map_err(|e| DomainError::Internal {
                message: format!("Failed to get enabled: {}", e),
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

const SELECT_COLUMNS: &str = "id, username, full_name, email, phone, password_hash, role, \
                              token_version, enabled, created_at, updated_at";

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let query = format!("SELECT {} FROM accounts WHERE id = ? LIMIT 1", SELECT_COLUMNS);

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find account by id: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        let query = format!(
            "SELECT {} FROM accounts WHERE username = ? LIMIT 1",
            SELECT_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find account by username: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_admins(&self) -> Result<Vec<Account>, DomainError> {
        let query = format!("SELECT {} FROM accounts WHERE role = 'ADMIN'", SELECT_COLUMNS);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find admin accounts: {}", e),
            })?;

        rows.iter().map(Self::row_to_account).collect()
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let query = r#"
            INSERT INTO accounts (
                id, username, full_name, email, phone, password_hash,
                role, token_version, enabled, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(account.id.to_string())
            .bind(&account.username)
            .bind(&account.full_name)
            .bind(&account.email)
            .bind(&account.phone)
            .bind(&account.password_hash)
            .bind(account.role.as_str())
            .bind(account.token_version)
            .bind(account.enabled)
            .bind(account.created_at)
            .bind(account.updated_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(account),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(DomainError::Validation {
                    message: "username already taken".to_string(),
                })
            }
            Err(e) => Err(DomainError::Internal {
                message: format!("Failed to create account: {}", e),
            }),
        }
    }

    async fn update(&self, account: Account) -> Result<Account, DomainError> {
        let query = r#"
            UPDATE accounts
            SET username = ?, full_name = ?, email = ?, phone = ?,
                password_hash = ?, role = ?, token_version = ?, enabled = ?,
                updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&account.username)
            .bind(&account.full_name)
            .bind(&account.email)
            .bind(&account.phone)
            .bind(&account.password_hash)
            .bind(account.role.as_str())
            .bind(account.token_version)
            .bind(account.enabled)
            .bind(account.updated_at)
            .bind(account.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update account: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Account"));
        }
        Ok(account)
    }

    async fn count_by_role(&self, role: Option<Role>) -> Result<u64, DomainError> {
        let row = match role {
            Some(role) => sqlx::query("SELECT COUNT(*) as count FROM accounts WHERE role = ?")
                .bind(role.as_str())
                .fetch_one(&self.pool)
                .await,
            None => {
                sqlx::query("SELECT COUNT(*) as count FROM accounts")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to count accounts: {}", e),
        })?;

        let count: i64 = row.try_get("count").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count: {}", e),
        })?;
        Ok(count as u64)
    }

    async fn count_enabled(&self) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM accounts WHERE enabled = TRUE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to count enabled accounts: {}", e),
            })?;

        let count: i64 = row.try_get("count").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count: {}", e),
        })?;
        Ok(count as u64)
    }
}
