//! Guest list routes for the owner dashboard.
//!
//! Guest records are remote-only; the dashboard shows the couple who is
//! coming, and a list private to one server's disk would defeat that.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use domain::models::guest::{CreateGuestRequest, GuestListResponse};
use domain::models::Guest;
use persistence::repositories::{GuestRepository, InvitationRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Session;

/// GET /api/v1/invitations/:id/guests
pub async fn list_guests(
    State(state): State<AppState>,
    session: Session,
    Path(invitation_id): Path<Uuid>,
) -> Result<Json<GuestListResponse>, ApiError> {
    let (invitations, guests) = require_remote(&state)?;
    ensure_owned(&invitations, invitation_id, session.user_id).await?;

    let data = guests.list_for_invitation(invitation_id).await?;
    Ok(Json(GuestListResponse::from_guests(data)))
}

/// POST /api/v1/invitations/:id/guests
pub async fn add_guest(
    State(state): State<AppState>,
    session: Session,
    Path(invitation_id): Path<Uuid>,
    Json(request): Json<CreateGuestRequest>,
) -> Result<(StatusCode, Json<Guest>), ApiError> {
    request.validate()?;

    let (invitations, guests) = require_remote(&state)?;
    ensure_owned(&invitations, invitation_id, session.user_id).await?;

    let guest = guests.create_guest(invitation_id, &request).await?;
    Ok((StatusCode::CREATED, Json(guest)))
}

fn require_remote(
    state: &AppState,
) -> Result<(InvitationRepository, GuestRepository), ApiError> {
    match (state.invitations(), state.guests()) {
        (Some(invitations), Some(guests)) => Ok((invitations, guests)),
        _ => Err(ApiError::NotProvisioned(
            "guest lists require a provisioned remote store".to_string(),
        )),
    }
}

async fn ensure_owned(
    invitations: &InvitationRepository,
    invitation_id: Uuid,
    owner_id: Uuid,
) -> Result<(), ApiError> {
    invitations
        .find_owned(invitation_id, owner_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))
}
