//! Value objects used across the domain.

pub mod auth_response;
pub mod listing_draft;

pub use auth_response::AuthResponse;
pub use listing_draft::ListingDraft;
