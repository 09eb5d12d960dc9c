//! Customer bookmarks on listings.

pub mod service;

#[cfg(test)]
mod tests;

pub use service::SavedListingService;
