//! Authentication: registration, login, logout, password changes.

pub mod service;

#[cfg(test)]
mod tests;

pub use service::AuthService;
