//! Cascading deletion coordinator.

pub mod service;

#[cfg(test)]
mod tests;

pub use service::CascadeCoordinator;
