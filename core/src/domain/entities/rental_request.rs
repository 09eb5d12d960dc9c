//! Rental request entity: a customer's application to rent a listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a rental request
///
/// `Pending` and `Selected` count as live for the per-listing cap and
/// the duplicate check. `Rejected` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Selected,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    /// Live requests occupy capacity on the listing
    pub fn is_live(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Selected)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_live()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Selected => "SELECTED",
            RequestStatus::Rejected => "REJECTED",
            RequestStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<RequestStatus> {
        match value {
            "PENDING" => Some(RequestStatus::Pending),
            "SELECTED" => Some(RequestStatus::Selected),
            "REJECTED" => Some(RequestStatus::Rejected),
            "CANCELLED" => Some(RequestStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer's application to rent a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalRequest {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub customer_id: Uuid,
    pub status: RequestStatus,
    /// Message from the customer to the owner
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RentalRequest {
    pub fn new(listing_id: Uuid, customer_id: Uuid, message: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            listing_id,
            customer_id,
            status: RequestStatus::Pending,
            message,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: RequestStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_request_is_pending() {
        let request = RentalRequest::new(Uuid::new_v4(), Uuid::new_v4(), None);
        assert_eq!(request.status, RequestStatus::Pending);
        assert!(request.is_pending());
    }

    #[test]
    fn live_and_terminal_partition_statuses() {
        assert!(RequestStatus::Pending.is_live());
        assert!(RequestStatus::Selected.is_live());
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Cancelled.is_terminal());
    }

    #[test]
    fn set_status_touches_updated_at() {
        let mut request = RentalRequest::new(Uuid::new_v4(), Uuid::new_v4(), None);
        let before = request.updated_at;
        request.set_status(RequestStatus::Rejected);
        assert_eq!(request.status, RequestStatus::Rejected);
        assert!(request.updated_at >= before);
    }
}
