//! Rental request lifecycle: creation, cancellation, selection.

pub mod service;

#[cfg(test)]
mod tests;

pub use service::RequestService;
