//! Template builder routes.
//!
//! Templates reconcile like invitations, with one difference: the id the
//! client assigned at creation is preserved by the remote upsert, so the id
//! itself is the business key.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use domain::models::template::{SaveTemplateRequest, TemplateResponse};
use domain::models::CustomTemplate;
use persistence::reconcile::Reconciled;
use persistence::repositories::TemplateRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Session;
use crate::routes::{CollectionResponse, SaveResponse};

/// GET /api/v1/templates
pub async fn list_templates(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CollectionResponse<TemplateResponse>>, ApiError> {
    let repo = state.templates();
    let outcome = state
        .reconciler
        .load_collection::<CustomTemplate, TemplateRepository>(repo.as_ref(), session.user_id)
        .await?;

    let fallback = state.reconciler.fallback();
    let data = outcome
        .entities
        .into_iter()
        .map(|template| {
            let local_only = fallback.contains(CustomTemplate::KIND, &template.id.to_string());
            TemplateResponse {
                template,
                local_only,
            }
        })
        .collect();

    Ok(Json(CollectionResponse {
        data,
        degraded: outcome.degraded,
        advisory: outcome.advisory,
    }))
}

/// GET /api/v1/templates/public
///
/// Public gallery; no authentication. Degraded mode serves an empty gallery
/// rather than an error page.
pub async fn list_public_templates(
    State(state): State<AppState>,
) -> Result<Json<CollectionResponse<CustomTemplate>>, ApiError> {
    let Some(repo) = state.templates() else {
        return Ok(Json(CollectionResponse {
            data: Vec::new(),
            degraded: true,
            advisory: None,
        }));
    };

    match repo.list_public(state.config.app.public_template_limit).await {
        Ok(data) => Ok(Json(CollectionResponse {
            data,
            degraded: false,
            advisory: None,
        })),
        Err(err) if err.is_recoverable() => {
            warn!(error = %err, "Public gallery degraded");
            Ok(Json(CollectionResponse {
                data: Vec::new(),
                degraded: true,
                advisory: None,
            }))
        }
        Err(err) => Err(err.into()),
    }
}

/// POST /api/v1/templates
pub async fn create_template(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<SaveTemplateRequest>,
) -> Result<(StatusCode, Json<SaveResponse<TemplateResponse>>), ApiError> {
    request.validate()?;
    request.config.validate()?;

    let repo = state.templates();
    let template = CustomTemplate::from_request(session.user_id, request);
    let outcome = state
        .reconciler
        .save_entity(repo.as_ref(), &template)
        .await?;

    let response = SaveResponse {
        data: TemplateResponse {
            local_only: outcome.local_only,
            template: outcome.entity,
        },
        advisory: outcome.advisory,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /api/v1/templates/:id
pub async fn update_template(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(request): Json<SaveTemplateRequest>,
) -> Result<Json<SaveResponse<TemplateResponse>>, ApiError> {
    request.validate()?;
    request.config.validate()?;

    let repo = state.templates();
    let mut template = find_current(&state, &repo, id, session.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Template not found".to_string()))?;

    template.apply_save(request);
    let outcome = state
        .reconciler
        .save_entity(repo.as_ref(), &template)
        .await?;

    Ok(Json(SaveResponse {
        data: TemplateResponse {
            local_only: outcome.local_only,
            template: outcome.entity,
        },
        advisory: outcome.advisory,
    }))
}

/// DELETE /api/v1/templates/:id
pub async fn delete_template(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = state.templates();
    let template = find_current(&state, &repo, id, session.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Template not found".to_string()))?;

    if let Some(repo) = &repo {
        match repo.delete_owned(id, session.user_id).await {
            Ok(_) => {}
            Err(err) if err.is_recoverable() => {
                warn!(id = %id, error = %err, "Remote template delete failed");
            }
            Err(err) => return Err(err.into()),
        }
    }

    state
        .reconciler
        .fallback()
        .remove(CustomTemplate::KIND, &template.id.to_string())?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_current(
    state: &AppState,
    repo: &Option<TemplateRepository>,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<CustomTemplate>, ApiError> {
    if let Some(repo) = repo {
        match repo.find_owned(id, owner_id).await {
            Ok(Some(template)) => return Ok(Some(template)),
            Ok(None) => {}
            Err(err) if err.is_recoverable() => {
                warn!(id = %id, error = %err, "Remote lookup failed, trying local fallback");
            }
            Err(err) => return Err(err.into()),
        }
    }

    // The id is the business key, so the local record sits under it directly.
    let local: Option<CustomTemplate> = state
        .reconciler
        .fallback()
        .get(CustomTemplate::KIND, &id.to_string());
    Ok(local.filter(|t| t.owner_id == owner_id))
}
