//! Database module - MySQL implementations using SQLx
//!
//! Provides connection pool management, repository implementations,
//! and the transactional unit of work.

pub mod connection;
pub mod mysql;

pub use connection::DatabasePool;
pub use mysql::{
    MySqlAccountRepository, MySqlListingRepository, MySqlNotificationRepository,
    MySqlRequestRepository, MySqlSavedListingRepository, MySqlUnitOfWork,
};
