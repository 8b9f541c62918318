//! Guest and RSVP repository for remote store operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::guest::{CreateGuestRequest, RsvpRequest};
use domain::models::Guest;

use crate::entities::GuestEntity;
use crate::error::RemoteError;
use crate::metrics::QueryTimer;

const GUEST_COLUMNS: &str = "id, invitation_id, name, phone, email, attending, message, created_at";

/// Repository for guest list and public RSVP operations. Both tables are
/// insert-only; there is no update path.
#[derive(Clone)]
pub struct GuestRepository {
    pool: PgPool,
}

impl GuestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a guest to the owner's list.
    pub async fn create_guest(
        &self,
        invitation_id: Uuid,
        request: &CreateGuestRequest,
    ) -> Result<Guest, RemoteError> {
        let timer = QueryTimer::new("create_guest");
        let result = sqlx::query_as::<_, GuestEntity>(&format!(
            r#"
            INSERT INTO guests (invitation_id, name, phone, email, attending)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {GUEST_COLUMNS}
            "#
        ))
        .bind(invitation_id)
        .bind(&request.name)
        .bind(&request.phone)
        .bind(&request.email)
        .bind(request.attending)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(Guest::from(result?))
    }

    /// Record a public RSVP submission against an active invitation. The
    /// active check and the insert happen in one statement so a deactivated
    /// invitation cannot accept submissions in between.
    pub async fn create_rsvp(
        &self,
        slug: &str,
        request: &RsvpRequest,
    ) -> Result<Option<Guest>, RemoteError> {
        let timer = QueryTimer::new("create_rsvp");
        let result = sqlx::query_as::<_, GuestEntity>(&format!(
            r#"
            INSERT INTO rsvps (invitation_id, name, phone, attending, message)
            SELECT i.id, $2, $3, $4, $5
            FROM invitations i
            WHERE i.slug = $1 AND i.is_active = true
            RETURNING {GUEST_COLUMNS}
            "#
        ))
        .bind(slug)
        .bind(&request.name)
        .bind(&request.phone)
        .bind(request.attending)
        .bind(&request.message)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Guest::from))
    }

    /// Combined guest list for the owner dashboard: owner-added guests and
    /// public RSVP submissions, newest first.
    pub async fn list_for_invitation(
        &self,
        invitation_id: Uuid,
    ) -> Result<Vec<Guest>, RemoteError> {
        let timer = QueryTimer::new("list_guests_for_invitation");
        let result = sqlx::query_as::<_, GuestEntity>(&format!(
            r#"
            SELECT {GUEST_COLUMNS} FROM guests WHERE invitation_id = $1
            UNION ALL
            SELECT {GUEST_COLUMNS} FROM rsvps WHERE invitation_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(invitation_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(Guest::from).collect())
    }
}
