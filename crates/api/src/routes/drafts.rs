//! Draft cache routes.
//!
//! Drafts hold resumable in-progress builder state per user and kind. They
//! live in process memory only and are cleared automatically when the
//! corresponding entity reaches the remote store.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use domain::models::{CustomTemplate, Invitation};
use persistence::reconcile::Reconciled;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Session;

fn check_kind(kind: &str) -> Result<(), ApiError> {
    if kind == Invitation::KIND || kind == CustomTemplate::KIND {
        Ok(())
    } else {
        Err(ApiError::Validation(format!("unknown draft kind '{kind}'")))
    }
}

/// GET /api/v1/drafts/:kind
pub async fn get_draft(
    State(state): State<AppState>,
    session: Session,
    Path(kind): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    check_kind(&kind)?;

    state
        .drafts
        .get(session.user_id, &kind)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no {kind} draft")))
}

/// PUT /api/v1/drafts/:kind
pub async fn put_draft(
    State(state): State<AppState>,
    session: Session,
    Path(kind): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> Result<StatusCode, ApiError> {
    check_kind(&kind)?;

    state.drafts.set(session.user_id, &kind, &value);
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/drafts/:kind
pub async fn delete_draft(
    State(state): State<AppState>,
    session: Session,
    Path(kind): Path<String>,
) -> Result<StatusCode, ApiError> {
    check_kind(&kind)?;

    state.drafts.delete(session.user_id, &kind);
    Ok(StatusCode::NO_CONTENT)
}
