//! # Infrastructure Layer
//!
//! Concrete implementations of the core crate's persistence and storage
//! ports:
//! - **Database**: MySQL repositories and the transactional unit of work,
//!   using SQLx
//! - **Media**: listing image storage on the local filesystem

// Re-export core error types for convenience
pub use rh_core::errors::*;

pub mod database;
pub mod media;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

/// Loads environment-backed configuration for the application
///
/// Reads a `.env` file when present, then builds the config from the
/// process environment.
pub fn load_config() -> rh_shared::config::AppConfig {
    dotenvy::dotenv().ok();
    rh_shared::config::AppConfig::from_env()
}

/// Installs the global tracing subscriber
///
/// `RUST_LOG` overrides the configured level. JSON output follows the
/// logging configuration, which in turn follows the environment.
pub fn init_tracing(config: &rh_shared::config::LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.level.clone()));

    if config.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
