//! Profile entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Profile;

/// Database row mapping for the profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileEntity> for Profile {
    fn from(entity: ProfileEntity) -> Self {
        Profile {
            id: entity.id,
            email: entity.email,
            display_name: entity.display_name,
            phone: entity.phone,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
