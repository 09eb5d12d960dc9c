//! Account management: profile lookups, deletion, statistics.

pub mod service;

#[cfg(test)]
mod tests;

pub use service::AccountService;
