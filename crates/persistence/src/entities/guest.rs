//! Guest/RSVP entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Guest;

/// Database row mapping for the guests and rsvps tables (same shape; the
/// tables differ in who inserts into them).
#[derive(Debug, Clone, FromRow)]
pub struct GuestEntity {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub attending: bool,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<GuestEntity> for Guest {
    fn from(entity: GuestEntity) -> Self {
        Guest {
            id: entity.id,
            invitation_id: entity.invitation_id,
            name: entity.name,
            phone: entity.phone,
            email: entity.email,
            attending: entity.attending,
            message: entity.message,
            created_at: entity.created_at,
        }
    }
}
