//! Profile repository for remote store operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::profile::UpdateProfileRequest;
use domain::models::Profile;

use crate::entities::ProfileEntity;
use crate::error::RemoteError;
use crate::metrics::QueryTimer;

const PROFILE_COLUMNS: &str = "id, email, display_name, phone, created_at, updated_at";

/// Repository for profile remote store operations. Profiles mirror the auth
/// provider's identity and are created lazily on first use.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the profile for an auth identity, creating the row if this is
    /// the first authenticated request for that user.
    pub async fn ensure(&self, id: Uuid, email: Option<&str>) -> Result<Profile, RemoteError> {
        let timer = QueryTimer::new("ensure_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(&format!(
            r#"
            INSERT INTO profiles (id, email)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET
                email = COALESCE(EXCLUDED.email, profiles.email)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(email)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(Profile::from(result?))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, RemoteError> {
        let timer = QueryTimer::new("find_profile_by_id");
        let result = sqlx::query_as::<_, ProfileEntity>(&format!(
            r#"
            SELECT {PROFILE_COLUMNS}
            FROM profiles
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Profile::from))
    }

    /// Update the caller's own profile. `None` fields keep their value.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateProfileRequest,
    ) -> Result<Option<Profile>, RemoteError> {
        let timer = QueryTimer::new("update_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(&format!(
            r#"
            UPDATE profiles
            SET display_name = COALESCE($2, display_name),
                phone = COALESCE($3, phone),
                updated_at = now()
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&request.display_name)
        .bind(&request.phone)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Profile::from))
    }
}
