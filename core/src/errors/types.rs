//! Error type definitions for authentication, token management, and the
//! listing/request lifecycles.
//!
//! Every expected, recoverable-by-caller condition is a distinct variant
//! with a human-readable message; unanticipated failures travel as
//! `DomainError::Internal` instead.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::rental_request::RequestStatus;

/// Authentication and authorization errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Not authorized to perform this action")]
    NotAuthorized,

    #[error("Admin accounts cannot be deleted")]
    AdminDeletionForbidden,
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::AccountDisabled => "ACCOUNT_DISABLED",
            AuthError::NotAuthorized => "NOT_AUTHORIZED",
            AuthError::AdminDeletionForbidden => "ADMIN_DELETION_FORBIDDEN",
        }
    }
}

/// Token validation and management errors
///
/// All variants map to the `INVALID_TOKEN` code: callers get a uniform
/// "re-authenticate" signal while logs keep the precise cause.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token version does not match the account's current version")]
    VersionMismatch,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Token subject does not match the account")]
    SubjectMismatch,

    #[error("Token subject account no longer exists")]
    UnknownSubject,

    #[error("Expected a {expected} token")]
    WrongTokenKind { expected: &'static str },

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

impl TokenError {
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
            _ => "INVALID_TOKEN",
        }
    }
}

/// Listing lifecycle errors
#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Listing was already decided by {reviewed_by} at {reviewed_at}")]
    AlreadyReviewed {
        reviewed_by: Uuid,
        reviewed_at: DateTime<Utc>,
    },

    #[error("Another review of this listing is in flight, try again")]
    Locked,

    #[error("Listing cannot be {action} in its current status")]
    InvalidStatus { action: &'static str },
}

impl ListingError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ListingError::AlreadyReviewed { .. } => "ALREADY_REVIEWED",
            ListingError::Locked => "LOCKED",
            ListingError::InvalidStatus { .. } => "INVALID_STATUS",
        }
    }
}

/// Rental request lifecycle errors
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Listing has reached its limit of {max} rental requests")]
    LimitExceeded { max: u32 },

    #[error("A rental request for this listing already exists")]
    Duplicate,

    #[error("Rental request in status {status} cannot be modified")]
    InvalidStatus { status: RequestStatus },
}

impl RequestError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::LimitExceeded { .. } => "LIMIT_EXCEEDED",
            RequestError::Duplicate => "DUPLICATE_REQUEST",
            RequestError::InvalidStatus { .. } => "INVALID_STATUS",
        }
    }
}
