//! Custom template entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::template::TemplateConfig;
use domain::models::CustomTemplate;

/// Database row mapping for the custom_templates table. The visual config
/// is stored as JSONB and parsed into the tagged variant on the way out.
#[derive(Debug, Clone, FromRow)]
pub struct TemplateEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub config: serde_json::Value,
    pub is_public: bool,
    pub is_featured: bool,
    pub usage_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TemplateEntity {
    /// Parses the stored config blob into the tagged variant. A row whose
    /// config no longer deserializes is data corruption; the caller decides
    /// whether to skip or fail.
    pub fn into_domain(self) -> Result<CustomTemplate, serde_json::Error> {
        let config: TemplateConfig = serde_json::from_value(self.config)?;
        Ok(CustomTemplate {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            description: self.description,
            config,
            is_public: self.is_public,
            is_featured: self.is_featured,
            usage_count: self.usage_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
