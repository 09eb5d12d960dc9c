//! Saved listing entity: a customer's bookmark on a listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookmark placed by a customer on a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedListing {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub listing_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl SavedListing {
    pub fn new(customer_id: Uuid, listing_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            listing_id,
            created_at: Utc::now(),
        }
    }
}
