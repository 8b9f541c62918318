use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use persistence::error::RemoteError;
use persistence::fallback::FallbackError;
use persistence::reconcile::ReconcileError;
use shared::jwt::JwtError;
use shared::pagination::CursorError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The remote store was never provisioned and the requested operation
    /// has no local fallback.
    #[error("Remote store not provisioned: {0}")]
    NotProvisioned(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::NotProvisioned(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "not_provisioned",
                msg.clone(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg.clone(),
            ),
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RemoteError> for ApiError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::NotProvisioned(_) => ApiError::NotProvisioned(err.to_string()),
            RemoteError::Unavailable(_) | RemoteError::Timeout { .. } => {
                ApiError::ServiceUnavailable(err.to_string())
            }
            RemoteError::Denied(msg) => ApiError::Forbidden(msg),
            RemoteError::Conflict(msg) => ApiError::Conflict(msg),
            RemoteError::MissingReference => {
                ApiError::NotFound("Referenced record not found".into())
            }
            RemoteError::Query(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Denied(remote) => remote.into(),
            ReconcileError::Fallback(fallback) => fallback.into(),
        }
    }
}

impl From<FallbackError> for ApiError {
    fn from(err: FallbackError) -> Self {
        // The fallback store is the last line; its failure is terminal for
        // the operation.
        ApiError::Internal(err.to_string())
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<CursorError> for ApiError {
    fn from(err: CursorError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();

        ApiError::Validation(messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                ApiError::Unauthorized("no token".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::Forbidden("policy".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("slug taken".into()), StatusCode::CONFLICT),
            (
                ApiError::Validation("bad input".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::NotProvisioned("no endpoint".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_remote_error_mapping() {
        let err: ApiError = RemoteError::NotProvisioned("relation missing".into()).into();
        assert!(matches!(err, ApiError::NotProvisioned(_)));

        let err: ApiError = RemoteError::Denied("row policy".into()).into();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err: ApiError = RemoteError::Unavailable("refused".into()).into();
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));

        let err: ApiError = RemoteError::Timeout { timeout_secs: 5 }.into();
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));

        let err: ApiError = RemoteError::MissingReference.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_reconcile_denied_maps_to_forbidden() {
        let err: ApiError =
            ReconcileError::Denied(RemoteError::Denied("row policy".into())).into();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_validation_errors_join_messages() {
        use validator::Validate;

        #[derive(Validate)]
        struct Form {
            #[validate(length(min = 1, message = "name must not be empty"))]
            name: String,
        }

        let form = Form {
            name: String::new(),
        };
        let err: ApiError = form.validate().unwrap_err().into();
        assert!(err.to_string().contains("name must not be empty"));
    }
}
