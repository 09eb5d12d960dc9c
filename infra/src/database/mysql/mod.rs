//! MySQL repository implementations.

pub mod account_repository_impl;
pub mod listing_repository_impl;
pub mod notification_repository_impl;
pub mod request_repository_impl;
pub mod saved_listing_repository_impl;
pub mod unit_of_work_impl;

pub use account_repository_impl::MySqlAccountRepository;
pub use listing_repository_impl::MySqlListingRepository;
pub use notification_repository_impl::MySqlNotificationRepository;
pub use request_repository_impl::MySqlRequestRepository;
pub use saved_listing_repository_impl::MySqlSavedListingRepository;
pub use unit_of_work_impl::MySqlUnitOfWork;
