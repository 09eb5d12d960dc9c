//! Listing draft: owner-supplied content for creating or editing a listing.

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

/// Content an owner submits when creating or editing a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub address: String,
    /// Floor area in square meters
    pub area: f64,
    /// Monthly rent
    pub price_per_month: f64,
    /// Cap on simultaneous live rental requests; defaults when omitted
    pub max_tenants: Option<u32>,
}

impl ListingDraft {
    /// Validates the draft before it touches a listing
    pub fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "title must not be empty".to_string(),
            });
        }
        if self.address.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "address must not be empty".to_string(),
            });
        }
        if self.area <= 0.0 {
            return Err(DomainError::Validation {
                message: "area must be positive".to_string(),
            });
        }
        if self.price_per_month <= 0.0 {
            return Err(DomainError::Validation {
                message: "price_per_month must be positive".to_string(),
            });
        }
        if let Some(max) = self.max_tenants {
            if max == 0 {
                return Err(DomainError::Validation {
                    message: "max_tenants must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ListingDraft {
        ListingDraft {
            title: "Quiet flat".to_string(),
            description: "Two rooms".to_string(),
            address: "5 Mill Lane".to_string(),
            area: 52.0,
            price_per_month: 950.0,
            max_tenants: Some(4),
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn empty_title_rejected() {
        let mut d = draft();
        d.title = "  ".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn non_positive_price_rejected() {
        let mut d = draft();
        d.price_per_month = 0.0;
        assert!(d.validate().is_err());
    }

    #[test]
    fn zero_max_tenants_rejected() {
        let mut d = draft();
        d.max_tenants = Some(0);
        assert!(d.validate().is_err());
    }
}
