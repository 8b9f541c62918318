//! Administrative records: purchase requests and subscriptions.
//!
//! Status updates are remote-only operations that record the acting admin and
//! the transition timestamp; there is no local fallback for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Lifecycle of a purchase request handled manually over WhatsApp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "purchase_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Contacted,
    Completed,
    Rejected,
}

impl PurchaseStatus {
    /// Legal transitions: pending -> contacted -> completed, and any
    /// non-terminal state may be rejected.
    pub fn can_transition_to(self, next: PurchaseStatus) -> bool {
        use PurchaseStatus::*;
        matches!(
            (self, next),
            (Pending, Contacted) | (Pending, Rejected) | (Contacted, Completed) | (Contacted, Rejected)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PurchaseStatus::Completed | PurchaseStatus::Rejected)
    }
}

/// Lifecycle of a user subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Expired,
}

impl SubscriptionStatus {
    pub fn can_transition_to(self, next: SubscriptionStatus) -> bool {
        use SubscriptionStatus::*;
        matches!((self, next), (Active, Cancelled) | (Active, Expired))
    }
}

/// A request to purchase a paid plan, created from the pricing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PurchaseRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan: String,
    pub contact_phone: String,
    pub note: Option<String>,
    pub status: PurchaseStatus,
    /// Admin who applied the last status transition.
    pub handled_by: Option<Uuid>,
    pub handled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A paid subscription granted after a completed purchase request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan: String,
    pub status: SubscriptionStatus,
    pub started_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// User-side request to open a purchase request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreatePurchaseRequest {
    #[validate(length(min = 1, max = 50, message = "plan must be 1-50 characters"))]
    pub plan: String,

    #[validate(length(min = 5, max = 30, message = "contact_phone must be 5-30 characters"))]
    pub contact_phone: String,

    #[validate(length(max = 500, message = "note must be at most 500 characters"))]
    pub note: Option<String>,
}

/// Admin-side request to grant a subscription, typically after a purchase
/// request completes.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateSubscriptionRequest {
    pub user_id: Uuid,

    #[validate(length(min = 1, max = 50, message = "plan must be 1-50 characters"))]
    pub plan: String,

    pub expires_at: Option<DateTime<Utc>>,
}

/// Admin-side status transition request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdatePurchaseStatusRequest {
    pub status: PurchaseStatus,
}

/// Admin-side subscription status transition request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateSubscriptionStatusRequest {
    pub status: SubscriptionStatus,
}

/// Paginated admin listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminListResponse<T> {
    pub data: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}
