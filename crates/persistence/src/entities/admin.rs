//! Administrative entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::admin::{
    PurchaseRequest, PurchaseStatus, Subscription, SubscriptionStatus,
};

/// Database row mapping for the purchase_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct PurchaseRequestEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan: String,
    pub contact_phone: String,
    pub note: Option<String>,
    pub status: PurchaseStatus,
    pub handled_by: Option<Uuid>,
    pub handled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<PurchaseRequestEntity> for PurchaseRequest {
    fn from(entity: PurchaseRequestEntity) -> Self {
        PurchaseRequest {
            id: entity.id,
            user_id: entity.user_id,
            plan: entity.plan,
            contact_phone: entity.contact_phone,
            note: entity.note,
            status: entity.status,
            handled_by: entity.handled_by,
            handled_at: entity.handled_at,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the user_subscriptions table.
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan: String,
    pub status: SubscriptionStatus,
    pub started_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubscriptionEntity> for Subscription {
    fn from(entity: SubscriptionEntity) -> Self {
        Subscription {
            id: entity.id,
            user_id: entity.user_id,
            plan: entity.plan,
            status: entity.status,
            started_at: entity.started_at,
            expires_at: entity.expires_at,
            updated_by: entity.updated_by,
            updated_at: entity.updated_at,
        }
    }
}
