//! Authentication response returned to a successfully logged-in client.

use serde::{Deserialize, Serialize};

use crate::domain::entities::account::Role;

/// Token pair and account role returned on login and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Role of the authenticated account
    pub role: Role,
}

impl AuthResponse {
    pub fn new(access_token: String, refresh_token: String, expires_in: i64, role: Role) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_round_trip() {
        let response = AuthResponse::new("a".into(), "r".into(), 900, Role::Customer);
        let json = serde_json::to_string(&response).unwrap();
        let back: AuthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(response, back);
    }
}
