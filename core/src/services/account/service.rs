//! Account service implementation.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::{AuthError, DomainError};
use crate::repositories::{AccountRepository, ListingRepository, UnitOfWork};
use crate::services::coordinator::CascadeCoordinator;
use crate::services::storage::MediaStorage;

/// Service managing accounts beyond authentication
pub struct AccountService<A, L, U, M>
where
    A: AccountRepository,
    L: ListingRepository,
    U: UnitOfWork,
    M: MediaStorage,
{
    accounts: Arc<A>,
    coordinator: Arc<CascadeCoordinator<L, U, M>>,
}

impl<A, L, U, M> AccountService<A, L, U, M>
where
    A: AccountRepository,
    L: ListingRepository,
    U: UnitOfWork,
    M: MediaStorage,
{
    pub fn new(accounts: Arc<A>, coordinator: Arc<CascadeCoordinator<L, U, M>>) -> Self {
        Self {
            accounts,
            coordinator,
        }
    }

    /// Looks up an account by ID
    pub async fn get(&self, account_id: Uuid) -> Result<Account, DomainError> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Account"))
    }

    /// Deletes an account and everything hanging off it
    ///
    /// Allowed for the account itself and for admins. Admin accounts
    /// can never be deleted, not even by themselves, so the system
    /// cannot be left without a reviewer.
    ///
    /// # Errors
    /// * `NotFound` - Target account does not exist
    /// * `AuthError::NotAuthorized` - Caller is neither the target nor an admin
    /// * `AuthError::AdminDeletionForbidden` - Target is an admin account
    pub async fn delete(&self, actor_id: Uuid, target_id: Uuid) -> Result<(), DomainError> {
        let actor = self.get(actor_id).await?;
        let target = self.get(target_id).await?;

        if actor_id != target_id && !actor.is_admin() {
            return Err(AuthError::NotAuthorized.into());
        }
        if target.is_admin() {
            return Err(AuthError::AdminDeletionForbidden.into());
        }

        self.coordinator.delete_account(target_id).await?;
        info!(account_id = %target_id, "Account deleted");
        Ok(())
    }

    /// Disables an account without deleting it
    ///
    /// Disabled accounts fail login and token validation. Only admins
    /// may disable, and admin accounts cannot be disabled.
    pub async fn set_enabled(
        &self,
        admin_id: Uuid,
        target_id: Uuid,
        enabled: bool,
    ) -> Result<Account, DomainError> {
        let admin = self.get(admin_id).await?;
        if !admin.is_admin() {
            return Err(AuthError::NotAuthorized.into());
        }
        let mut target = self.get(target_id).await?;
        if target.is_admin() {
            return Err(AuthError::NotAuthorized.into());
        }

        target.enabled = enabled;
        if !enabled {
            // Kill outstanding sessions along with the account
            target.bump_token_version();
        }
        self.accounts.update(target).await
    }

    /// Share of accounts that are enabled, as a percentage
    ///
    /// An empty table yields 0.0 rather than a division error.
    pub async fn active_percentage(&self) -> Result<f64, DomainError> {
        let total = self.accounts.count_by_role(None).await?;
        if total == 0 {
            return Ok(0.0);
        }
        let enabled = self.accounts.count_enabled().await?;
        Ok(enabled as f64 / total as f64 * 100.0)
    }
}
