//! Shared utilities and common types for RentHub server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures
//! - Common type definitions

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DatabaseConfig, Environment, JwtConfig, LoggingConfig, ServerConfig, StorageConfig,
};
pub use types::response::ErrorResponse;
