//! Tests for login, logout, and password changes.

use std::sync::Arc;

use crate::domain::entities::account::Role;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::{AccountRepository, InMemoryStore};
use crate::services::auth::AuthService;
use crate::services::token::{RevocationRegistry, TokenService, TokenServiceConfig};

fn setup() -> (AuthService<InMemoryStore>, Arc<TokenService<InMemoryStore>>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let tokens = Arc::new(TokenService::new(
        store.clone(),
        Arc::new(RevocationRegistry::new()),
        TokenServiceConfig {
            jwt_secret: "test-secret-at-least-32-characters!!".to_string(),
            ..TokenServiceConfig::default()
        },
    ));
    let auth = AuthService::new(store.clone(), tokens.clone());
    (auth, tokens, store)
}

#[tokio::test]
async fn register_then_login() {
    let (auth, tokens, _store) = setup();

    let account = auth
        .register("alice", "Alice A", "alice@example.com", "+11111", "s3cretpass", Role::Owner)
        .await
        .unwrap();
    assert_eq!(account.token_version, 0);

    let response = auth.login("alice", "s3cretpass").await.unwrap();
    assert_eq!(response.role, Role::Owner);

    let claims = tokens
        .validate_access_token(&response.access_token)
        .await
        .unwrap();
    assert_eq!(claims.account_id().unwrap(), account.id);
    // Login bumps the version before issuing
    assert_eq!(claims.token_version, 1);
}

#[tokio::test]
async fn register_rejects_short_password() {
    let (auth, _tokens, _store) = setup();
    let err = auth
        .register("bob", "Bob", "b@example.com", "+1", "short", Role::Customer)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn login_unknown_username() {
    let (auth, _tokens, _store) = setup();
    let err = auth.login("nobody", "whatever123").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn login_wrong_password() {
    let (auth, _tokens, _store) = setup();
    auth.register("carol", "Carol", "c@example.com", "+1", "s3cretpass", Role::Customer)
        .await
        .unwrap();

    let err = auth.login("carol", "wrongpassword").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn login_disabled_account() {
    let (auth, _tokens, store) = setup();
    let mut account = auth
        .register("dave", "Dave", "d@example.com", "+1", "s3cretpass", Role::Customer)
        .await
        .unwrap();
    account.enabled = false;
    AccountRepository::update(store.as_ref(), account).await.unwrap();

    let err = auth.login("dave", "s3cretpass").await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::AccountDisabled)));
}

#[tokio::test]
async fn second_login_invalidates_first_session() {
    let (auth, tokens, _store) = setup();
    auth.register("erin", "Erin", "e@example.com", "+1", "s3cretpass", Role::Customer)
        .await
        .unwrap();

    let first = auth.login("erin", "s3cretpass").await.unwrap();
    let _second = auth.login("erin", "s3cretpass").await.unwrap();

    let err = tokens
        .validate_access_token(&first.access_token)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::VersionMismatch)
    ));
}

#[tokio::test]
async fn logout_kills_both_tokens() {
    let (auth, tokens, _store) = setup();
    auth.register("frank", "Frank", "f@example.com", "+1", "s3cretpass", Role::Owner)
        .await
        .unwrap();

    let session = auth.login("frank", "s3cretpass").await.unwrap();
    auth.logout(&session.access_token).await.unwrap();

    // Version bump covers both; the access token is also revoked by jti
    assert!(tokens
        .validate_access_token(&session.access_token)
        .await
        .is_err());
    assert!(tokens.refresh(&session.refresh_token).await.is_err());
}

#[tokio::test]
async fn change_password_requires_current() {
    let (auth, _tokens, _store) = setup();
    let account = auth
        .register("gina", "Gina", "g@example.com", "+1", "s3cretpass", Role::Customer)
        .await
        .unwrap();

    let err = auth
        .change_password(account.id, "wrongpassword", "newpassword1")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::InvalidCredentials)
    ));

    auth.change_password(account.id, "s3cretpass", "newpassword1")
        .await
        .unwrap();
    auth.login("gina", "newpassword1").await.unwrap();
}

#[tokio::test]
async fn change_password_invalidates_sessions() {
    let (auth, tokens, _store) = setup();
    let account = auth
        .register("hugo", "Hugo", "h@example.com", "+1", "s3cretpass", Role::Customer)
        .await
        .unwrap();

    let session = auth.login("hugo", "s3cretpass").await.unwrap();
    auth.change_password(account.id, "s3cretpass", "newpassword1")
        .await
        .unwrap();

    let err = tokens
        .validate_access_token(&session.access_token)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::VersionMismatch)
    ));
}
