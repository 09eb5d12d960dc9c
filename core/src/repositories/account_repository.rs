//! Account repository trait defining the interface for account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::account::{Account, Role};
use crate::errors::DomainError;

/// Repository trait for Account entity persistence operations
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by its unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - No account with the given ID
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError>;

    /// Find an account by username
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError>;

    /// Find all accounts holding the admin role
    ///
    /// Used to fan out review notifications when a listing is created
    /// or resubmitted.
    async fn find_admins(&self) -> Result<Vec<Account>, DomainError>;

    /// Create a new account
    ///
    /// # Returns
    /// * `Ok(Account)` - The created account
    /// * `Err(DomainError)` - Creation failed (e.g., duplicate username)
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Update an existing account
    ///
    /// # Returns
    /// * `Ok(Account)` - The updated account
    /// * `Err(DomainError)` - Update failed (e.g., account not found)
    async fn update(&self, account: Account) -> Result<Account, DomainError>;

    /// Count accounts, optionally filtered by role
    async fn count_by_role(&self, role: Option<Role>) -> Result<u64, DomainError>;

    /// Count enabled accounts
    async fn count_enabled(&self) -> Result<u64, DomainError>;
}
