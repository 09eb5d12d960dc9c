//! Token issuing, validation, and revocation.

pub mod config;
pub mod registry;
pub mod service;


pub use config::TokenServiceConfig;
pub use registry::{RegistrySweeper, RevocationRegistry, SweeperConfig};
pub use service::TokenService;
