//! Repository traits defining the persistence ports of the domain.
//!
//! Each trait is async-first and returns `DomainError` on failure.
//! Implementations live in the infrastructure crate; an in-memory
//! store backs the test suites.

pub mod account_repository;
pub mod listing_repository;
pub mod memory;
pub mod notification_repository;
pub mod request_repository;
pub mod saved_listing_repository;
pub mod unit_of_work;

pub use account_repository::AccountRepository;
pub use listing_repository::ListingRepository;
pub use memory::InMemoryStore;
pub use notification_repository::NotificationRepository;
pub use request_repository::RequestRepository;
pub use saved_listing_repository::SavedListingRepository;
pub use unit_of_work::{SelectionOutcome, UnitOfWork};
