//! In-app notifications: the delivery port and the inbox service.

pub mod service;
pub mod traits;

#[cfg(test)]
mod tests;

pub use service::NotificationService;
pub use traits::{NotificationDraft, Notifier};
