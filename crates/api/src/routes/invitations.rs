//! Invitation builder routes.
//!
//! All operations go through the reconciliation layer: reads merge the
//! remote store with the local fallback store, writes land remotely when
//! possible and locally otherwise. The caller always learns which.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use domain::models::invitation::{
    generate_slug_candidate, invitation_url, CreateInvitationRequest, InvitationResponse,
    UpdateInvitationRequest,
};
use domain::models::Invitation;
use persistence::error::RemoteError;
use persistence::reconcile::Reconciled;
use persistence::repositories::InvitationRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Session;
use crate::routes::{CollectionResponse, SaveResponse};

fn to_response(state: &AppState, invitation: Invitation, local_only: bool) -> InvitationResponse {
    let url = invitation_url(&state.config.app.base_url, &invitation.slug);
    InvitationResponse {
        invitation,
        invitation_url: url,
        local_only,
    }
}

/// GET /api/v1/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CollectionResponse<InvitationResponse>>, ApiError> {
    let repo = state.invitations();
    let outcome = state
        .reconciler
        .load_collection::<Invitation, InvitationRepository>(repo.as_ref(), session.user_id)
        .await?;

    let fallback = state.reconciler.fallback();
    let data = outcome
        .entities
        .into_iter()
        .map(|invitation| {
            let local_only = fallback.contains(Invitation::KIND, &invitation.slug);
            to_response(&state, invitation, local_only)
        })
        .collect();

    Ok(Json(CollectionResponse {
        data,
        degraded: outcome.degraded,
        advisory: outcome.advisory,
    }))
}

/// POST /api/v1/invitations
pub async fn create_invitation(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<SaveResponse<InvitationResponse>>), ApiError> {
    request.validate()?;

    let repo = state.invitations();
    let slug = resolve_slug(&repo, &request).await?;

    // A referenced template must be the caller's own or public. When the
    // remote store cannot answer, the reference is accepted unchecked; a
    // dangling id resolves to the category default at render time.
    if let (Some(template_id), Some(templates)) = (request.template_id, state.templates()) {
        match templates.find_usable(template_id, session.user_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(ApiError::NotFound("Template not found".to_string()));
            }
            Err(err) if err.is_recoverable() => {
                warn!(template_id = %template_id, error = %err, "Template check degraded");
            }
            Err(err) => return Err(err.into()),
        }
    }

    let invitation = Invitation::from_request(session.user_id, slug, request);
    let outcome = state
        .reconciler
        .save_entity(repo.as_ref(), &invitation)
        .await?;

    // Usage counters live in the remote store only; a local-only save bumps
    // nothing.
    if !outcome.local_only {
        if let (Some(template_id), Some(templates)) = (invitation.template_id, state.templates()) {
            if let Err(err) = templates.increment_usage(template_id).await {
                warn!(template_id = %template_id, error = %err, "Template usage bump failed");
            }
        }
    }

    let response = SaveResponse {
        data: to_response(&state, outcome.entity, outcome.local_only),
        advisory: outcome.advisory,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /api/v1/invitations/:id
pub async fn update_invitation(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateInvitationRequest>,
) -> Result<Json<SaveResponse<InvitationResponse>>, ApiError> {
    request.validate()?;

    let repo = state.invitations();
    let mut invitation = find_current(&state, &repo, id, session.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    invitation.apply_update(request);
    let outcome = state
        .reconciler
        .save_entity(repo.as_ref(), &invitation)
        .await?;

    Ok(Json(SaveResponse {
        data: to_response(&state, outcome.entity, outcome.local_only),
        advisory: outcome.advisory,
    }))
}

/// DELETE /api/v1/invitations/:id
///
/// Soft delete: deactivates the remote row and removes any local fallback
/// copy so the record stops appearing in merges.
pub async fn delete_invitation(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = state.invitations();
    let invitation = find_current(&state, &repo, id, session.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    if let Some(repo) = &repo {
        match repo.soft_delete(id, session.user_id).await {
            Ok(_) => {}
            Err(err) if err.is_recoverable() => {
                warn!(id = %id, error = %err, "Remote soft-delete failed");
            }
            Err(err) => return Err(err.into()),
        }
    }

    state
        .reconciler
        .fallback()
        .remove(Invitation::KIND, &invitation.slug)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Picks the slug for a new invitation: a validated custom slug checked for
/// availability, or a generated candidate retried until unique. When the
/// remote store cannot answer, the candidate is accepted as-is; a collision
/// then surfaces as a conflict on the eventual remote save.
async fn resolve_slug(
    repo: &Option<InvitationRepository>,
    request: &CreateInvitationRequest,
) -> Result<String, ApiError> {
    match &request.slug {
        Some(custom) => {
            if let Some(repo) = repo {
                match repo.slug_exists(custom).await {
                    Ok(true) => {
                        return Err(ApiError::Conflict(format!(
                            "slug '{}' is already taken",
                            custom
                        )))
                    }
                    Ok(false) => {}
                    Err(err) if err.is_recoverable() => {
                        warn!(slug = %custom, error = %err, "Slug availability check degraded");
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            Ok(custom.clone())
        }
        None => {
            let bride = request.bride_name.clone();
            let groom = request.groom_name.clone();
            let generate = move || generate_slug_candidate(&bride, &groom);

            if let Some(repo) = repo {
                match repo.generate_unique_slug(&generate).await {
                    Ok(slug) => return Ok(slug),
                    Err(err @ RemoteError::Conflict(_)) => return Err(err.into()),
                    Err(err) if err.is_recoverable() => {
                        warn!(error = %err, "Slug uniqueness check degraded, using candidate");
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            Ok(generate())
        }
    }
}

/// Finds the caller's invitation by internal id: the remote store first,
/// then the local fallback set. Both sources may hold the record under
/// different ids, which is why the local scan matches on id only after the
/// remote lookup misses.
async fn find_current(
    state: &AppState,
    repo: &Option<InvitationRepository>,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<Invitation>, ApiError> {
    if let Some(repo) = repo {
        match repo.find_owned(id, owner_id).await {
            Ok(Some(invitation)) => return Ok(Some(invitation)),
            Ok(None) => {}
            Err(err) if err.is_recoverable() => {
                warn!(id = %id, error = %err, "Remote lookup failed, trying local fallback");
            }
            Err(err) => return Err(err.into()),
        }
    }

    let local: Vec<Invitation> = state
        .reconciler
        .fallback()
        .get_all(Invitation::KIND, owner_id);
    Ok(local.into_iter().find(|i| i.id == id))
}
