//! Domain entities representing core business objects.

pub mod account;
pub mod listing;
pub mod notification;
pub mod rental_request;
pub mod saved_listing;
pub mod token;

// Re-export commonly used types
pub use account::{Account, Role};
pub use listing::{Listing, ListingImage, ListingStatus, DEFAULT_MAX_TENANTS};
pub use notification::Notification;
pub use rental_request::{RentalRequest, RequestStatus};
pub use saved_listing::SavedListing;
pub use token::{Claims, TokenKind, JWT_AUDIENCE, JWT_ISSUER};
