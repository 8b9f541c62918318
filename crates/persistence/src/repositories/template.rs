//! Custom template repository for remote store operations.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use domain::models::CustomTemplate;

use crate::entities::TemplateEntity;
use crate::error::RemoteError;
use crate::metrics::QueryTimer;
use crate::reconcile::RemoteCollection;

const TEMPLATE_COLUMNS: &str =
    "id, owner_id, name, description, config, is_public, is_featured, usage_count, created_at, updated_at";

/// Repository for custom template remote store operations.
#[derive(Clone)]
pub struct TemplateRepository {
    pool: PgPool,
}

impl TemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Public gallery listing: featured templates first, then by popularity.
    pub async fn list_public(&self, limit: i64) -> Result<Vec<CustomTemplate>, RemoteError> {
        let timer = QueryTimer::new("list_public_templates");
        let result = sqlx::query_as::<_, TemplateEntity>(&format!(
            r#"
            SELECT {TEMPLATE_COLUMNS}
            FROM custom_templates
            WHERE is_public = true
            ORDER BY is_featured DESC, usage_count DESC, created_at DESC
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(parse_rows(result?))
    }

    /// Find one of the owner's templates by id.
    pub async fn find_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<CustomTemplate>, RemoteError> {
        let timer = QueryTimer::new("find_template_owned");
        let result = sqlx::query_as::<_, TemplateEntity>(&format!(
            r#"
            SELECT {TEMPLATE_COLUMNS}
            FROM custom_templates
            WHERE id = $1 AND owner_id = $2
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        match result? {
            Some(row) => match row.into_domain() {
                Ok(template) => Ok(Some(template)),
                Err(err) => {
                    warn!(template_id = %id, error = %err, "Skipping template with unparseable config");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Find a template the caller may use: their own, or any public one.
    pub async fn find_usable(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<CustomTemplate>, RemoteError> {
        let timer = QueryTimer::new("find_usable_template");
        let result = sqlx::query_as::<_, TemplateEntity>(&format!(
            r#"
            SELECT {TEMPLATE_COLUMNS}
            FROM custom_templates
            WHERE id = $1 AND (owner_id = $2 OR is_public = true)
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        match result? {
            Some(row) => match row.into_domain() {
                Ok(template) => Ok(Some(template)),
                Err(err) => {
                    warn!(template_id = %id, error = %err, "Skipping template with unparseable config");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Bump the usage counter when a template is applied to an invitation.
    pub async fn increment_usage(&self, id: Uuid) -> Result<(), RemoteError> {
        let timer = QueryTimer::new("increment_template_usage");
        let result = sqlx::query(
            r#"
            UPDATE custom_templates
            SET usage_count = usage_count + 1
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.record();
        result?;
        Ok(())
    }

    /// Delete a template owned by `owner_id`. Returns rows affected.
    pub async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<u64, RemoteError> {
        let timer = QueryTimer::new("delete_template");
        let result = sqlx::query(
            r#"
            DELETE FROM custom_templates
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}

#[async_trait]
impl RemoteCollection<CustomTemplate> for TemplateRepository {
    async fn fetch_owned(&self, owner_id: Uuid) -> Result<Vec<CustomTemplate>, RemoteError> {
        let timer = QueryTimer::new("list_templates_by_owner");
        let result = sqlx::query_as::<_, TemplateEntity>(&format!(
            r#"
            SELECT {TEMPLATE_COLUMNS}
            FROM custom_templates
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(parse_rows(result?))
    }

    /// Insert-or-update by id. Unlike invitations, templates keep the id the
    /// client assigned when the template was first drafted, so the same id
    /// identifies the record locally and remotely.
    async fn upsert(&self, entity: &CustomTemplate) -> Result<CustomTemplate, RemoteError> {
        let timer = QueryTimer::new("upsert_template");
        let config = serde_json::to_value(&entity.config)
            .map_err(|err| RemoteError::Query(sqlx::Error::Encode(err.into())))?;
        let result = sqlx::query_as::<_, TemplateEntity>(&format!(
            r#"
            INSERT INTO custom_templates
                (id, owner_id, name, description, config, is_public, is_featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                config = EXCLUDED.config,
                is_public = EXCLUDED.is_public,
                updated_at = now()
            WHERE custom_templates.owner_id = EXCLUDED.owner_id
            RETURNING {TEMPLATE_COLUMNS}
            "#
        ))
        .bind(entity.id)
        .bind(entity.owner_id)
        .bind(&entity.name)
        .bind(&entity.description)
        .bind(config)
        .bind(entity.is_public)
        .bind(entity.is_featured)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        match result? {
            Some(row) => row
                .into_domain()
                .map_err(|err| RemoteError::Query(sqlx::Error::Decode(err.into()))),
            None => Err(RemoteError::Denied(format!(
                "template {} belongs to another owner",
                entity.id
            ))),
        }
    }
}

/// Converts rows to domain templates, skipping rows whose config blob no
/// longer parses rather than failing the whole listing.
fn parse_rows(rows: Vec<TemplateEntity>) -> Vec<CustomTemplate> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match row.into_domain() {
                Ok(template) => Some(template),
                Err(err) => {
                    warn!(template_id = %id, error = %err, "Skipping template with unparseable config");
                    None
                }
            }
        })
        .collect()
}
