//! Public invitation page and RSVP submission.
//!
//! No authentication: these are the routes behind the shareable URL. The
//! page read falls back to the local store so a locally saved invitation is
//! viewable at the same URL it will have once synced.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::warn;
use validator::Validate;

use domain::models::guest::RsvpRequest;
use domain::models::invitation::PublicInvitationView;
use domain::models::{Guest, Invitation};
use persistence::reconcile::Reconciled;

use crate::app::AppState;
use crate::error::ApiError;

/// GET /api/v1/i/:slug
pub async fn view_invitation(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicInvitationView>, ApiError> {
    if let Some(repo) = state.invitations() {
        match repo.find_active_by_slug(&slug).await {
            Ok(Some(invitation)) => {
                // View counting is best effort; a failed bump never fails
                // the page.
                if let Err(e) = repo.increment_views(&slug).await {
                    warn!(slug = %slug, error = %e, "Failed to increment view count");
                }
                return Ok(Json(invitation.public_view()));
            }
            // Absent remotely; the record may still exist locally if it was
            // saved while degraded.
            Ok(None) => {}
            Err(err) if err.is_recoverable() => {
                warn!(slug = %slug, error = %err, "Remote lookup failed, trying local fallback");
            }
            Err(err) => return Err(err.into()),
        }
    }

    let local: Option<Invitation> = state.reconciler.fallback().get(Invitation::KIND, &slug);
    match local {
        Some(invitation) if invitation.is_active => Ok(Json(invitation.public_view())),
        _ => Err(ApiError::NotFound("Invitation not found".to_string())),
    }
}

/// POST /api/v1/i/:slug/rsvp
///
/// RSVP submissions are remote-only: a visitor's response written to one
/// server's local disk would be invisible to the couple, so without the
/// remote store the form reports the outage instead of pretending.
pub async fn submit_rsvp(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<RsvpRequest>,
) -> Result<(StatusCode, Json<Guest>), ApiError> {
    request.validate()?;

    let Some(repo) = state.guests() else {
        return Err(ApiError::NotProvisioned(
            "RSVP submissions require a provisioned remote store".to_string(),
        ));
    };

    match repo.create_rsvp(&slug, &request).await? {
        Some(guest) => Ok((StatusCode::CREATED, Json(guest))),
        None => Err(ApiError::NotFound("Invitation not found".to_string())),
    }
}
