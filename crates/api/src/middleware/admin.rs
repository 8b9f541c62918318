//! Admin gate for administrative routes.
//!
//! Admin operations are remote-only: the allowlist lives in the remote
//! store, so without a provisioned remote store there is no admin surface.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;

/// Middleware that rejects requests whose session identity is not on the
/// admin allowlist.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let token = match req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        Some(token) => token,
        None => {
            return ApiError::Unauthorized("Missing bearer token".to_string()).into_response()
        }
    };

    let user_id = match state.jwt.verify(token).and_then(|c| c.user_id()) {
        Ok(user_id) => user_id,
        Err(err) => return ApiError::from(err).into_response(),
    };

    let Some(admin_users) = state.admin_users() else {
        return ApiError::NotProvisioned(
            "admin operations require a provisioned remote store".to_string(),
        )
        .into_response();
    };

    match admin_users.is_admin(user_id).await {
        Ok(true) => next.run(req).await,
        Ok(false) => {
            ApiError::Forbidden("admin privileges required".to_string()).into_response()
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}
