//! User-facing billing routes: purchase requests and subscriptions.
//!
//! Purchases are handled manually (the admin calls the customer back), so
//! the user side is create-and-watch. Everything here is remote-only.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use domain::models::admin::{CreatePurchaseRequest, PurchaseRequest, Subscription};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Session;

/// POST /api/v1/purchase-requests
pub async fn create_purchase_request(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CreatePurchaseRequest>,
) -> Result<(StatusCode, Json<PurchaseRequest>), ApiError> {
    request.validate()?;

    let repo = state.purchase_requests().ok_or_else(not_provisioned)?;
    let created = repo.create(session.user_id, &request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/purchase-requests
pub async fn list_own_purchase_requests(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<PurchaseRequest>>, ApiError> {
    let repo = state.purchase_requests().ok_or_else(not_provisioned)?;
    Ok(Json(repo.list_for_user(session.user_id).await?))
}

/// GET /api/v1/subscriptions
pub async fn list_own_subscriptions(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Subscription>>, ApiError> {
    let repo = state.subscriptions().ok_or_else(not_provisioned)?;
    Ok(Json(repo.list_for_user(session.user_id).await?))
}

fn not_provisioned() -> ApiError {
    ApiError::NotProvisioned("billing requires a provisioned remote store".to_string())
}
