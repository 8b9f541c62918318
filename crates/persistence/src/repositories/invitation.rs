//! Invitation repository for remote store operations.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::Invitation;

use crate::entities::InvitationEntity;
use crate::error::RemoteError;
use crate::metrics::QueryTimer;
use crate::reconcile::RemoteCollection;

const INVITATION_COLUMNS: &str = "id, owner_id, bride_name, groom_name, event_date, venue_name, \
     venue_address, message, template_id, slug, is_active, view_count, settings, created_at, updated_at";

/// Repository for invitation-related remote store operations.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an active invitation by slug, for the public invitation page.
    pub async fn find_active_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Invitation>, RemoteError> {
        let timer = QueryTimer::new("find_invitation_by_slug");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            SELECT {INVITATION_COLUMNS}
            FROM invitations
            WHERE slug = $1 AND is_active = true
            "#
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Invitation::from))
    }

    /// Find one of the owner's invitations by id, active or not.
    pub async fn find_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Invitation>, RemoteError> {
        let timer = QueryTimer::new("find_invitation_owned");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            SELECT {INVITATION_COLUMNS}
            FROM invitations
            WHERE id = $1 AND owner_id = $2
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Invitation::from))
    }

    /// Bump the public view counter. Best effort from the caller's side.
    pub async fn increment_views(&self, slug: &str) -> Result<(), RemoteError> {
        let timer = QueryTimer::new("increment_invitation_views");
        let result = sqlx::query(
            r#"
            UPDATE invitations
            SET view_count = view_count + 1
            WHERE slug = $1 AND is_active = true
            "#,
        )
        .bind(slug)
        .execute(&self.pool)
        .await;
        timer.record();
        result?;
        Ok(())
    }

    /// Soft-delete (deactivate) an invitation owned by `owner_id`.
    /// Returns the number of rows affected.
    pub async fn soft_delete(&self, id: Uuid, owner_id: Uuid) -> Result<u64, RemoteError> {
        let timer = QueryTimer::new("soft_delete_invitation");
        let result = sqlx::query(
            r#"
            UPDATE invitations
            SET is_active = false, updated_at = now()
            WHERE id = $1 AND owner_id = $2 AND is_active = true
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Check if a slug is taken.
    pub async fn slug_exists(&self, slug: &str) -> Result<bool, RemoteError> {
        let timer = QueryTimer::new("check_invitation_slug_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM invitations WHERE slug = $1)
            "#,
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?)
    }

    /// Generate a unique slug by retrying the generator on collision.
    pub async fn generate_unique_slug<F>(&self, generator: F) -> Result<String, RemoteError>
    where
        F: Fn() -> String,
    {
        let mut slug = generator();
        let mut attempts = 0;

        while self.slug_exists(&slug).await? {
            slug = generator();
            attempts += 1;
            if attempts > 100 {
                return Err(RemoteError::Conflict(
                    "could not generate a unique slug".to_string(),
                ));
            }
        }

        Ok(slug)
    }
}

#[async_trait]
impl RemoteCollection<Invitation> for InvitationRepository {
    /// Owner-scoped collection of active invitations.
    async fn fetch_owned(&self, owner_id: Uuid) -> Result<Vec<Invitation>, RemoteError> {
        let timer = QueryTimer::new("list_invitations_by_owner");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            SELECT {INVITATION_COLUMNS}
            FROM invitations
            WHERE owner_id = $1 AND is_active = true
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(Invitation::from).collect())
    }

    /// Insert-or-update by slug. The remote store assigns its own id on
    /// first insert; a locally assigned id is deliberately not carried over,
    /// which is why merges key on the slug. The conflict update is guarded
    /// by owner so one user cannot overwrite another's slug.
    async fn upsert(&self, entity: &Invitation) -> Result<Invitation, RemoteError> {
        let timer = QueryTimer::new("upsert_invitation");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            INSERT INTO invitations
                (owner_id, bride_name, groom_name, event_date, venue_name, venue_address,
                 message, template_id, slug, is_active, settings)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (slug) DO UPDATE SET
                bride_name = EXCLUDED.bride_name,
                groom_name = EXCLUDED.groom_name,
                event_date = EXCLUDED.event_date,
                venue_name = EXCLUDED.venue_name,
                venue_address = EXCLUDED.venue_address,
                message = EXCLUDED.message,
                template_id = EXCLUDED.template_id,
                is_active = EXCLUDED.is_active,
                settings = EXCLUDED.settings,
                updated_at = now()
            WHERE invitations.owner_id = EXCLUDED.owner_id
            RETURNING {INVITATION_COLUMNS}
            "#
        ))
        .bind(entity.owner_id)
        .bind(&entity.bride_name)
        .bind(&entity.groom_name)
        .bind(entity.event_date)
        .bind(&entity.venue_name)
        .bind(&entity.venue_address)
        .bind(&entity.message)
        .bind(entity.template_id)
        .bind(&entity.slug)
        .bind(entity.is_active)
        .bind(&entity.settings)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        match result? {
            Some(row) => Ok(Invitation::from(row)),
            // Conflict row exists but belongs to someone else
            None => Err(RemoteError::Denied(format!(
                "slug '{}' belongs to another owner",
                entity.slug
            ))),
        }
    }
}
