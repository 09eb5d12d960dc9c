//! Domain services implementing the application's business operations.

pub mod account;
pub mod auth;
pub mod coordinator;
pub mod listing;
pub mod notification;
pub mod request;
pub mod saved;
pub mod storage;
pub mod token;

pub use account::AccountService;
pub use auth::AuthService;
pub use coordinator::CascadeCoordinator;
pub use listing::{ListingService, ReviewLocks};
pub use notification::{NotificationDraft, NotificationService, Notifier};
pub use request::RequestService;
pub use saved::SavedListingService;
pub use storage::MediaStorage;
pub use token::{RegistrySweeper, RevocationRegistry, SweeperConfig, TokenService, TokenServiceConfig};
