//! Invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Invitation;

/// Database row mapping for the invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub bride_name: String,
    pub groom_name: String,
    pub event_date: DateTime<Utc>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub message: Option<String>,
    pub template_id: Option<Uuid>,
    pub slug: String,
    pub is_active: bool,
    pub view_count: i64,
    pub settings: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvitationEntity> for Invitation {
    fn from(entity: InvitationEntity) -> Self {
        Invitation {
            id: entity.id,
            owner_id: entity.owner_id,
            bride_name: entity.bride_name,
            groom_name: entity.groom_name,
            event_date: entity.event_date,
            venue_name: entity.venue_name,
            venue_address: entity.venue_address,
            message: entity.message,
            template_id: entity.template_id,
            slug: entity.slug,
            is_active: entity.is_active,
            view_count: entity.view_count,
            settings: entity.settings,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
