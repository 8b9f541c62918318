//! Administrative routes: purchase request handling and subscription grants.
//!
//! Status transitions go through the reconciler's remote-only path: the
//! bounded wait applies, but there is deliberately no local fallback, and
//! every transition records which admin applied it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::admin::{
    AdminListResponse, CreateSubscriptionRequest, PurchaseRequest, PurchaseStatus, Subscription,
    SubscriptionStatus, UpdatePurchaseStatusRequest, UpdateSubscriptionStatusRequest,
};
use shared::pagination::{decode_cursor, encode_cursor};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Session;

#[derive(Debug, Deserialize)]
pub struct PurchaseListParams {
    pub status: Option<PurchaseStatus>,
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionListParams {
    pub status: Option<SubscriptionStatus>,
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/v1/admin/purchase-requests
pub async fn list_purchase_requests(
    State(state): State<AppState>,
    _session: Session,
    Query(params): Query<PurchaseListParams>,
) -> Result<Json<AdminListResponse<PurchaseRequest>>, ApiError> {
    let repo = state.purchase_requests().ok_or_else(not_provisioned)?;

    let cursor = params.cursor.as_deref().map(decode_cursor).transpose()?;
    let limit = page_limit(&state, params.limit);

    let data = repo.list(params.status, cursor, limit).await?;
    let next_cursor = (data.len() == limit as usize)
        .then(|| data.last().map(|r| encode_cursor(r.created_at, r.id)))
        .flatten();

    Ok(Json(AdminListResponse { data, next_cursor }))
}

/// PUT /api/v1/admin/purchase-requests/:id/status
pub async fn update_purchase_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePurchaseStatusRequest>,
) -> Result<Json<PurchaseRequest>, ApiError> {
    let repo = state.purchase_requests().ok_or_else(not_provisioned)?;

    let current = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Purchase request not found".to_string()))?;

    if !current.status.can_transition_to(request.status) {
        return Err(ApiError::Conflict(format!(
            "cannot transition purchase request from {:?} to {:?}",
            current.status, request.status
        )));
    }

    let updated = state
        .reconciler
        .update_status(Some(&repo), id, request.status, session.user_id)
        .await?;
    Ok(Json(updated))
}

/// POST /api/v1/admin/subscriptions
pub async fn create_subscription(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<Subscription>), ApiError> {
    request.validate()?;

    let repo = state.subscriptions().ok_or_else(not_provisioned)?;
    let created = repo
        .create(
            request.user_id,
            &request.plan,
            request.expires_at,
            session.user_id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/admin/subscriptions
pub async fn list_subscriptions(
    State(state): State<AppState>,
    _session: Session,
    Query(params): Query<SubscriptionListParams>,
) -> Result<Json<AdminListResponse<Subscription>>, ApiError> {
    let repo = state.subscriptions().ok_or_else(not_provisioned)?;

    let cursor = params.cursor.as_deref().map(decode_cursor).transpose()?;
    let limit = page_limit(&state, params.limit);

    let data = repo.list(params.status, cursor, limit).await?;
    let next_cursor = (data.len() == limit as usize)
        .then(|| data.last().map(|r| encode_cursor(r.started_at, r.id)))
        .flatten();

    Ok(Json(AdminListResponse { data, next_cursor }))
}

/// PUT /api/v1/admin/subscriptions/:id/status
pub async fn update_subscription_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSubscriptionStatusRequest>,
) -> Result<Json<Subscription>, ApiError> {
    let repo = state.subscriptions().ok_or_else(not_provisioned)?;

    let current = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Subscription not found".to_string()))?;

    if !current.status.can_transition_to(request.status) {
        return Err(ApiError::Conflict(format!(
            "cannot transition subscription from {:?} to {:?}",
            current.status, request.status
        )));
    }

    let updated = state
        .reconciler
        .update_status(Some(&repo), id, request.status, session.user_id)
        .await?;
    Ok(Json(updated))
}

fn page_limit(state: &AppState, requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(state.config.app.admin_page_size)
        .clamp(1, 100)
}

fn not_provisioned() -> ApiError {
    ApiError::NotProvisioned(
        "admin operations require a provisioned remote store".to_string(),
    )
}
