//! Listing entity: a property offered for rent, with its review and
//! rental state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::listing_draft::ListingDraft;
use crate::errors::{DomainResult, ListingError};

/// Default cap on simultaneous live rental requests per listing
pub const DEFAULT_MAX_TENANTS: u32 = 6;

/// Review/rental status of a listing
///
/// Transitions:
/// `PendingReview -> Approved | Rejected` (admin review, exactly once),
/// `Approved | Rejected -> PendingReview` (owner edit),
/// `Approved -> Rented` (request selection).
/// `Rented` and `Expired` are terminal for review purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    PendingReview,
    Approved,
    Rejected,
    Expired,
    Rented,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::PendingReview => "PENDING_REVIEW",
            ListingStatus::Approved => "APPROVED",
            ListingStatus::Rejected => "REJECTED",
            ListingStatus::Expired => "EXPIRED",
            ListingStatus::Rented => "RENTED",
        }
    }

    pub fn parse(value: &str) -> Option<ListingStatus> {
        match value {
            "PENDING_REVIEW" => Some(ListingStatus::PendingReview),
            "APPROVED" => Some(ListingStatus::Approved),
            "REJECTED" => Some(ListingStatus::Rejected),
            "EXPIRED" => Some(ListingStatus::Expired),
            "RENTED" => Some(ListingStatus::Rented),
            _ => None,
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image attached to a listing; owned by the listing and deleted with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingImage {
    pub id: Uuid,
    /// URL at the media storage provider
    pub url: String,
}

impl ListingImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
        }
    }
}

/// A property for rent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Unique identifier for the listing
    pub id: Uuid,

    /// Account that owns this listing
    pub owner_id: Uuid,

    pub title: String,
    pub description: String,
    pub address: String,

    /// Floor area in square meters
    pub area: f64,

    /// Monthly rent
    pub price_per_month: f64,

    /// Cap on simultaneous live rental requests
    pub max_tenants: u32,

    /// Number of live rental requests; invariant `current_tenants <= max_tenants`
    pub current_tenants: u32,

    /// The selected tenant once the listing is rented
    pub tenant_id: Option<Uuid>,

    /// Review/rental status
    pub status: ListingStatus,

    /// Admin that decided the review
    pub reviewed_by: Option<Uuid>,

    /// When the review was decided
    pub reviewed_at: Option<DateTime<Utc>>,

    /// Reason given on rejection
    pub reject_reason: Option<String>,

    /// Images owned by this listing
    pub images: Vec<ListingImage>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Creates a new listing awaiting review
    pub fn new(owner_id: Uuid, draft: ListingDraft, image_urls: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: draft.title,
            description: draft.description,
            address: draft.address,
            area: draft.area,
            price_per_month: draft.price_per_month,
            max_tenants: draft.max_tenants.unwrap_or(DEFAULT_MAX_TENANTS),
            current_tenants: 0,
            tenant_id: None,
            status: ListingStatus::PendingReview,
            reviewed_by: None,
            reviewed_at: None,
            reject_reason: None,
            images: image_urls.into_iter().map(ListingImage::new).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the review decision. Only legal from `PendingReview`;
    /// an already-decided listing yields `AlreadyReviewed` carrying
    /// who decided it and when.
    pub fn decide_review(
        &mut self,
        approved: bool,
        reviewer: Uuid,
        reject_reason: Option<String>,
    ) -> DomainResult<()> {
        if self.status != ListingStatus::PendingReview {
            return Err(ListingError::AlreadyReviewed {
                // Self-transitions out of PendingReview always stamp both
                // fields, so absence here means legacy data; fall back to
                // the reviewer performing this call.
                reviewed_by: self.reviewed_by.unwrap_or(reviewer),
                reviewed_at: self.reviewed_at.unwrap_or_else(Utc::now),
            }
            .into());
        }
        self.status = if approved {
            ListingStatus::Approved
        } else {
            ListingStatus::Rejected
        };
        self.reviewed_by = Some(reviewer);
        self.reviewed_at = Some(Utc::now());
        if !approved {
            self.reject_reason = reject_reason;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Applies edited content. A decided listing goes back to review;
    /// review metadata is cleared so the next decision starts fresh.
    pub fn apply_edit(&mut self, draft: ListingDraft, image_urls: Vec<String>) {
        self.title = draft.title;
        self.description = draft.description;
        self.address = draft.address;
        self.area = draft.area;
        self.price_per_month = draft.price_per_month;
        if let Some(max) = draft.max_tenants {
            self.max_tenants = max;
        }
        self.images = image_urls.into_iter().map(ListingImage::new).collect();
        if matches!(self.status, ListingStatus::Approved | ListingStatus::Rejected) {
            self.status = ListingStatus::PendingReview;
            self.reviewed_by = None;
            self.reviewed_at = None;
            self.reject_reason = None;
        }
        self.updated_at = Utc::now();
    }

    /// Finalizes a rental: assigns the tenant and moves to `Rented`.
    /// Invariant: `Rented` implies exactly one assigned tenant.
    pub fn mark_rented(&mut self, tenant_id: Uuid) -> DomainResult<()> {
        if self.status != ListingStatus::Approved {
            return Err(ListingError::InvalidStatus { action: "rented" }.into());
        }
        self.tenant_id = Some(tenant_id);
        self.status = ListingStatus::Rented;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether another live rental request fits under the cap
    pub fn has_capacity(&self, live_requests: u32) -> bool {
        live_requests < self.max_tenants
    }

    pub fn is_owned_by(&self, account_id: Uuid) -> bool {
        self.owner_id == account_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;

    fn draft() -> ListingDraft {
        ListingDraft {
            title: "Sunny studio".to_string(),
            description: "Close to the river".to_string(),
            address: "12 High St".to_string(),
            area: 35.0,
            price_per_month: 700.0,
            max_tenants: None,
        }
    }

    fn listing() -> Listing {
        Listing::new(Uuid::new_v4(), draft(), vec!["https://media/1.jpg".into()])
    }

    #[test]
    fn new_listing_awaits_review() {
        let listing = listing();
        assert_eq!(listing.status, ListingStatus::PendingReview);
        assert_eq!(listing.max_tenants, DEFAULT_MAX_TENANTS);
        assert_eq!(listing.images.len(), 1);
    }

    #[test]
    fn review_decides_exactly_once() {
        let mut listing = listing();
        let admin = Uuid::new_v4();
        listing.decide_review(true, admin, None).unwrap();
        assert_eq!(listing.status, ListingStatus::Approved);
        assert_eq!(listing.reviewed_by, Some(admin));
        assert!(listing.reviewed_at.is_some());

        let second = Uuid::new_v4();
        let err = listing.decide_review(false, second, None).unwrap_err();
        match err {
            DomainError::Listing(ListingError::AlreadyReviewed { reviewed_by, .. }) => {
                assert_eq!(reviewed_by, admin);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejection_keeps_the_reason() {
        let mut listing = listing();
        listing
            .decide_review(false, Uuid::new_v4(), Some("blurry photos".to_string()))
            .unwrap();
        assert_eq!(listing.status, ListingStatus::Rejected);
        assert_eq!(listing.reject_reason.as_deref(), Some("blurry photos"));
    }

    #[test]
    fn edit_resets_decided_listing_to_pending() {
        let mut listing = listing();
        listing.decide_review(true, Uuid::new_v4(), None).unwrap();

        listing.apply_edit(draft(), vec![]);
        assert_eq!(listing.status, ListingStatus::PendingReview);
        assert!(listing.reviewed_by.is_none());
        assert!(listing.reviewed_at.is_none());
        assert!(listing.images.is_empty());
    }

    #[test]
    fn edit_keeps_pending_status() {
        let mut listing = listing();
        listing.apply_edit(draft(), vec![]);
        assert_eq!(listing.status, ListingStatus::PendingReview);
    }

    #[test]
    fn rented_requires_approved_and_assigns_tenant() {
        let mut listing = listing();
        let tenant = Uuid::new_v4();
        assert!(listing.mark_rented(tenant).is_err());

        listing.decide_review(true, Uuid::new_v4(), None).unwrap();
        listing.mark_rented(tenant).unwrap();
        assert_eq!(listing.status, ListingStatus::Rented);
        assert_eq!(listing.tenant_id, Some(tenant));
    }

    #[test]
    fn capacity_respects_max_tenants() {
        let listing = listing();
        assert!(listing.has_capacity(5));
        assert!(!listing.has_capacity(6));
    }
}
