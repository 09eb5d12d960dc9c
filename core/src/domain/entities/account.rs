//! Account entity representing a registered user in the RentHub system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of an account in the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Lists properties for rent
    Owner,
    /// Applies to rent properties
    Customer,
    /// Reviews listings; cannot be deleted
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "OWNER",
            Role::Customer => "CUSTOMER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "OWNER" => Some(Role::Owner),
            "CUSTOMER" => Some(Role::Customer),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account entity representing a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,

    /// Unique login name
    pub username: String,

    /// Display name
    pub full_name: String,

    /// Contact email
    pub email: String,

    /// Contact phone number
    pub phone: String,

    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Role of this account
    pub role: Role,

    /// Monotonic counter embedded in every issued token. Bumping it
    /// invalidates all previously issued tokens for this account.
    pub token_version: i32,

    /// Whether the account has completed verification
    pub enabled: bool,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new enabled account with token version 0
    pub fn new(
        username: impl Into<String>,
        full_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            full_name: full_name.into(),
            email: email.into(),
            phone: phone.into(),
            password_hash: password_hash.into(),
            role,
            token_version: 0,
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Increments the token version, invalidating every token issued
    /// with the previous version. Must be persisted before new tokens
    /// are handed out.
    pub fn bump_token_version(&mut self) {
        self.token_version += 1;
        self.updated_at = Utc::now();
    }

    /// Replaces the credential hash and invalidates existing tokens
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.bump_token_version();
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }

    pub fn is_customer(&self) -> bool {
        self.role == Role::Customer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(role: Role) -> Account {
        Account::new("jane", "Jane Doe", "jane@example.com", "0400000000", "hash", role)
    }

    #[test]
    fn new_account_starts_at_version_zero() {
        let account = account(Role::Customer);
        assert_eq!(account.token_version, 0);
        assert!(account.enabled);
        assert!(account.is_customer());
    }

    #[test]
    fn bump_increments_by_exactly_one() {
        let mut account = account(Role::Owner);
        account.bump_token_version();
        account.bump_token_version();
        assert_eq!(account.token_version, 2);
    }

    #[test]
    fn password_change_bumps_version() {
        let mut account = account(Role::Customer);
        account.set_password_hash("new-hash");
        assert_eq!(account.password_hash, "new-hash");
        assert_eq!(account.token_version, 1);
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Owner, Role::Customer, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("TENANT"), None);
    }
}
