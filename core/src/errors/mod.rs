//! Domain-specific error types and error handling.

mod types;

// Re-export all error types and utilities
pub use types::{AuthError, ListingError, RequestError, TokenError};

pub use rh_shared::types::response::ErrorResponse;

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Listing(#[from] ListingError),

    #[error(transparent)]
    Request(#[from] RequestError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Shorthand for a `NotFound` error with the given resource name
    pub fn not_found(resource: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource: resource.into(),
        }
    }

    /// Stable error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Auth(e) => e.error_code(),
            DomainError::Token(e) => e.error_code(),
            DomainError::Listing(e) => e.error_code(),
            DomainError::Request(e) => e.error_code(),
        }
    }
}

impl From<DomainError> for ErrorResponse {
    fn from(err: DomainError) -> Self {
        ErrorResponse::new(err.error_code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn error_codes_are_stable() {
        let err = DomainError::not_found("listing");
        assert_eq!(err.error_code(), "NOT_FOUND");

        let err: DomainError = TokenError::VersionMismatch.into();
        assert_eq!(err.error_code(), "INVALID_TOKEN");

        let err: DomainError = RequestError::Duplicate.into();
        assert_eq!(err.error_code(), "DUPLICATE_REQUEST");
    }

    #[test]
    fn already_reviewed_carries_reviewer_and_time() {
        let reviewer = Uuid::new_v4();
        let at = Utc::now();
        let err: DomainError = ListingError::AlreadyReviewed {
            reviewed_by: reviewer,
            reviewed_at: at,
        }
        .into();

        assert_eq!(err.error_code(), "ALREADY_REVIEWED");
        assert!(err.to_string().contains(&reviewer.to_string()));
    }

    #[test]
    fn domain_error_converts_to_error_response() {
        let err: DomainError = RequestError::LimitExceeded { max: 6 }.into();
        let response: ErrorResponse = err.into();
        assert_eq!(response.error, "LIMIT_EXCEEDED");
        assert!(response.message.contains('6'));
    }
}
