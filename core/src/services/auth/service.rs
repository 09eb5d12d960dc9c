//! Authentication service implementation.

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::account::{Account, Role};
use crate::domain::value_objects::auth_response::AuthResponse;
use crate::errors::{AuthError, DomainError};
use crate::repositories::AccountRepository;
use crate::services::token::TokenService;

/// Minimum accepted password length
const MIN_PASSWORD_LENGTH: usize = 8;

/// Service handling account authentication
///
/// Login and logout both bump the account's token version, so a fresh
/// login invalidates whatever tokens an earlier session left behind,
/// and logout invalidates everything including the refresh token.
pub struct AuthService<A: AccountRepository> {
    accounts: Arc<A>,
    tokens: Arc<TokenService<A>>,
}

impl<A: AccountRepository> AuthService<A> {
    pub fn new(accounts: Arc<A>, tokens: Arc<TokenService<A>>) -> Self {
        Self { accounts, tokens }
    }

    /// Registers a new account
    ///
    /// # Errors
    /// * `Validation` - Empty username or password too short
    /// * `Validation` - Username already taken
    pub async fn register(
        &self,
        username: &str,
        full_name: &str,
        email: &str,
        phone: &str,
        password: &str,
        role: Role,
    ) -> Result<Account, DomainError> {
        if username.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "username must not be empty".to_string(),
            });
        }
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::Validation {
                message: format!("password must be at least {MIN_PASSWORD_LENGTH} characters"),
            });
        }

        let password_hash = hash(password, DEFAULT_COST).map_err(|e| DomainError::Internal {
            message: format!("password hashing failed: {e}"),
        })?;

        let account = Account::new(username, full_name, email, phone, password_hash, role);
        let created = self.accounts.create(account).await?;

        info!(account_id = %created.id, role = %created.role, "Account registered");
        Ok(created)
    }

    /// Authenticates an account and issues a token pair
    ///
    /// Bumps the token version before issuing, so tokens from earlier
    /// sessions stop validating the moment the login succeeds. The
    /// bumped account is persisted before any token is handed out.
    ///
    /// # Errors
    /// * `AuthError::InvalidCredentials` - Unknown username or wrong password
    /// * `AuthError::AccountDisabled` - Account is disabled
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, DomainError> {
        let mut account = self
            .accounts
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !account.enabled {
            return Err(AuthError::AccountDisabled.into());
        }

        let matches = verify(password, &account.password_hash).map_err(|e| {
            DomainError::Internal {
                message: format!("password verification failed: {e}"),
            }
        })?;
        if !matches {
            return Err(AuthError::InvalidCredentials.into());
        }

        account.bump_token_version();
        let account = self.accounts.update(account).await?;

        info!(account_id = %account.id, "Login succeeded");
        self.tokens.issue_pair(&account)
    }

    /// Logs out the session behind an access token
    ///
    /// Bumps the token version (killing the refresh token and any other
    /// outstanding tokens) and registers the presented access token as
    /// revoked so it dies immediately rather than at its expiry.
    pub async fn logout(&self, access_token: &str) -> Result<(), DomainError> {
        let claims = self.tokens.validate_access_token(access_token).await?;
        let account_id = claims
            .account_id()
            .map_err(|_| DomainError::not_found("Account"))?;

        let mut account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Account"))?;

        account.bump_token_version();
        self.accounts.update(account).await?;
        self.tokens.revoke_access_token(access_token, account_id)?;

        info!(account_id = %account_id, "Logout completed");
        Ok(())
    }

    /// Changes an account's password
    ///
    /// Setting the new hash bumps the token version, so every existing
    /// session has to log in again.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `AuthError::InvalidCredentials` - Current password is wrong
    /// * `Validation` - New password too short
    pub async fn change_password(
        &self,
        account_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        if new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::Validation {
                message: format!("password must be at least {MIN_PASSWORD_LENGTH} characters"),
            });
        }

        let mut account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Account"))?;

        let matches = verify(current_password, &account.password_hash).map_err(|e| {
            DomainError::Internal {
                message: format!("password verification failed: {e}"),
            }
        })?;
        if !matches {
            return Err(AuthError::InvalidCredentials.into());
        }

        let new_hash = hash(new_password, DEFAULT_COST).map_err(|e| DomainError::Internal {
            message: format!("password hashing failed: {e}"),
        })?;
        account.set_password_hash(new_hash);
        self.accounts.update(account).await?;

        info!(account_id = %account_id, "Password changed");
        Ok(())
    }
}
