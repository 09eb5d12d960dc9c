//! Main token service implementation

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::domain::entities::token::{Claims, TokenKind, JWT_AUDIENCE, JWT_ISSUER};
use crate::domain::value_objects::auth_response::AuthResponse;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::AccountRepository;

use super::config::TokenServiceConfig;
use super::registry::RevocationRegistry;

/// Service for issuing and validating JWT access and refresh tokens
///
/// Every token carries the account's `token_version` at issue time.
/// Bumping the version on the account (login, logout, password change)
/// invalidates all previously issued tokens at once; the revocation
/// registry additionally kills individual access tokens on logout.
pub struct TokenService<A: AccountRepository> {
    accounts: Arc<A>,
    registry: Arc<RevocationRegistry>,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl<A: AccountRepository> TokenService<A> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `accounts` - Account repository for version lookups
    /// * `registry` - Shared revocation registry
    /// * `config` - Token service configuration
    pub fn new(
        accounts: Arc<A>,
        registry: Arc<RevocationRegistry>,
        config: TokenServiceConfig,
    ) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[JWT_ISSUER]);
        validation.set_audience(&[JWT_AUDIENCE]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            accounts,
            registry,
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Issues an access/refresh token pair for an account
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Fresh pair stamped with the account's
    ///   current token version
    /// * `Err(DomainError)` - Token generation failed
    pub fn issue_pair(&self, account: &Account) -> Result<AuthResponse, DomainError> {
        let access = Claims::new_access_token(
            account.id,
            account.role,
            account.token_version,
            self.config.access_token_expiry_minutes,
        );
        let refresh = Claims::new_refresh_token(
            account.id,
            account.role,
            account.token_version,
            self.config.refresh_token_expiry_days,
        );

        let access_token = self.encode_jwt(&access)?;
        let refresh_token = self.encode_jwt(&refresh)?;

        Ok(AuthResponse::new(
            access_token,
            refresh_token,
            self.config.access_token_expiry_minutes * 60,
            account.role,
        ))
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Decodes a JWT, mapping signature and timing failures
    fn decode_jwt(&self, token: &str) -> Result<Claims, DomainError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        DomainError::Token(TokenError::TokenExpired)
                    }
                    jsonwebtoken::errors::ErrorKind::ImmatureSignature => {
                        DomainError::Token(TokenError::TokenNotYetValid)
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        DomainError::Token(TokenError::InvalidSignature)
                    }
                    _ => DomainError::Token(TokenError::InvalidTokenFormat),
                }
            })?;
        Ok(token_data.claims)
    }

    /// Validates an access token and returns its claims
    ///
    /// Checks, in order: signature and timing, token kind, the
    /// revocation registry, that the account still exists and is
    /// enabled, and that the token's version matches the account's
    /// current version.
    ///
    /// # Errors
    ///
    /// * `TokenError` variants for every rejection reason
    /// * `AuthError::AccountDisabled` - Account was disabled after issue
    pub async fn validate_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = self.decode_jwt(token)?;

        if claims.kind != TokenKind::Access {
            return Err(TokenError::WrongTokenKind { expected: "access" }.into());
        }
        if self.registry.is_revoked(&claims.jti) {
            return Err(TokenError::TokenRevoked.into());
        }

        let account = self.account_for(&claims).await?;
        if !account.enabled {
            return Err(AuthError::AccountDisabled.into());
        }
        if claims.token_version != account.token_version {
            return Err(TokenError::VersionMismatch.into());
        }

        Ok(claims)
    }

    /// Validates a refresh token and issues a fresh pair
    ///
    /// The new pair is stamped with the account's current version; the
    /// presented refresh token must itself carry the current version.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, DomainError> {
        let claims = self.decode_jwt(refresh_token)?;

        if claims.kind != TokenKind::Refresh {
            return Err(TokenError::WrongTokenKind {
                expected: "refresh",
            }
            .into());
        }

        let account = self.account_for(&claims).await?;
        if !account.enabled {
            return Err(AuthError::AccountDisabled.into());
        }
        if claims.token_version != account.token_version {
            return Err(TokenError::VersionMismatch.into());
        }

        self.issue_pair(&account)
    }

    /// Revokes an access token by registering its `jti` until expiry
    ///
    /// The token must decode and belong to `account_id`.
    pub fn revoke_access_token(&self, token: &str, account_id: Uuid) -> Result<(), DomainError> {
        let claims = self.decode_jwt(token)?;
        if claims.kind != TokenKind::Access {
            return Err(TokenError::WrongTokenKind { expected: "access" }.into());
        }
        let subject = claims
            .account_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidTokenFormat))?;
        if subject != account_id {
            return Err(TokenError::SubjectMismatch.into());
        }
        self.registry.revoke(&claims.jti, claims.exp);
        Ok(())
    }

    /// Account id embedded in a token, without checking the account
    pub fn subject_of(&self, token: &str) -> Result<Uuid, DomainError> {
        let claims = self.decode_jwt(token)?;
        claims
            .account_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidTokenFormat))
    }

    /// Natural expiry of a token, as a unix timestamp in seconds
    pub fn expiry_of(&self, token: &str) -> Result<i64, DomainError> {
        Ok(self.decode_jwt(token)?.exp)
    }

    async fn account_for(&self, claims: &Claims) -> Result<Account, DomainError> {
        let id = claims
            .account_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidTokenFormat))?;
        // An absent subject is indistinguishable from a forged token
        // to the caller, so it surfaces as an invalid token rather
        // than a not-found.
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::Token(TokenError::UnknownSubject))
    }
}
