//! # RentHub Core
//!
//! Core business logic and domain layer for the RentHub backend.
//! This crate contains domain entities, lifecycle services, repository
//! interfaces, and error types that form the foundation of the
//! application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    Account, Claims, Listing, ListingImage, ListingStatus, Notification, RentalRequest,
    RequestStatus, Role, SavedListing, TokenKind,
};
pub use domain::value_objects::{AuthResponse, ListingDraft};
pub use errors::{AuthError, DomainError, ListingError, RequestError, TokenError};
pub use repositories::{
    AccountRepository, InMemoryStore, ListingRepository, NotificationRepository,
    RequestRepository, SavedListingRepository, SelectionOutcome, UnitOfWork,
};
pub use services::{
    AccountService, AuthService, CascadeCoordinator, ListingService, MediaStorage,
    NotificationDraft, NotificationService, Notifier, RegistrySweeper, RequestService,
    RevocationRegistry, ReviewLocks, SavedListingService, SweeperConfig, TokenService,
    TokenServiceConfig,
};
