//! Profile routes.
//!
//! A profile mirrors the auth provider's identity; the row is created lazily
//! on the first authenticated read that misses it.

use axum::{extract::State, Json};
use validator::Validate;

use domain::models::profile::UpdateProfileRequest;
use domain::models::Profile;
use persistence::repositories::ProfileRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Session;

/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Profile>, ApiError> {
    let repo = require_remote(&state)?;
    let profile = repo
        .ensure(session.user_id, session.email.as_deref())
        .await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    request.validate()?;

    let repo = require_remote(&state)?;
    // Ensure first so an update straight after first login never misses.
    repo.ensure(session.user_id, session.email.as_deref())
        .await?;

    repo.update(session.user_id, &request)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
}

fn require_remote(state: &AppState) -> Result<ProfileRepository, ApiError> {
    state.profiles().ok_or_else(|| {
        ApiError::NotProvisioned("profiles require a provisioned remote store".to_string())
    })
}
