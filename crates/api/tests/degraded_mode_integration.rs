//! Integration tests for the degraded-mode service: no remote store is
//! configured at all, so every durable write must land in the local
//! fallback store and every read must be served from it.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use shared::jwt::{JwtConfig, DEFAULT_LEEWAY_SECS};
use taklifnoma_api::{app::create_app, config::Config};

const SESSION_SECRET: &str = "test-session-secret";

fn degraded_app(fallback_dir: &TempDir) -> Router {
    let config = Config::load_for_test(&[(
        "fallback.dir",
        fallback_dir.path().to_str().expect("utf-8 temp path"),
    )])
    .expect("Failed to load test config");

    create_app(config, None).expect("Failed to build app")
}

fn bearer(user_id: Uuid) -> String {
    let token = JwtConfig::from_secret(SESSION_SECRET, DEFAULT_LEEWAY_SECS)
        .sign(user_id, Some("asal@example.com"), 3600)
        .expect("Failed to sign test token");
    format!("Bearer {token}")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

fn create_invitation_body() -> Value {
    json!({
        "bride_name": "Asal",
        "groom_name": "Jahon",
        "event_date": (chrono::Utc::now() + chrono::Duration::days(60)).to_rfc3339(),
        "venue_name": "Navruz to'yxonasi",
        "message": "Sizni to'yimizga taklif qilamiz!"
    })
}

#[tokio::test]
async fn test_save_lands_in_fallback_with_advisory() {
    let dir = TempDir::new().unwrap();
    let app = degraded_app(&dir);
    let user = Uuid::new_v4();

    let response = app
        .oneshot(
            Request::post("/api/v1/invitations")
                .header(header::AUTHORIZATION, bearer(user))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(create_invitation_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;

    assert_eq!(body["data"]["local_only"], true);
    assert_eq!(body["advisory"]["kind"], "not_provisioned");

    let slug = body["data"]["slug"].as_str().unwrap();
    assert!(slug.starts_with("asal-jahon-"));
    assert_eq!(
        body["data"]["invitation_url"].as_str().unwrap(),
        format!("https://taklifnoma.uz/i/{slug}")
    );
}

#[tokio::test]
async fn test_list_serves_fallback_and_keeps_url_stable() {
    let dir = TempDir::new().unwrap();
    let user = Uuid::new_v4();

    let saved = degraded_app(&dir)
        .oneshot(
            Request::post("/api/v1/invitations")
                .header(header::AUTHORIZATION, bearer(user))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(create_invitation_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let saved = body_json(saved).await;
    let saved_url = saved["data"]["invitation_url"].as_str().unwrap().to_string();

    // A fresh router over the same fallback directory: the record survives
    // the process, not just the router instance.
    let response = degraded_app(&dir)
        .oneshot(
            Request::get("/api/v1/invitations")
                .header(header::AUTHORIZATION, bearer(user))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["degraded"], true);
    assert_eq!(body["advisory"]["kind"], "not_provisioned");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["local_only"], true);
    assert_eq!(body["data"][0]["invitation_url"].as_str().unwrap(), saved_url);
}

#[tokio::test]
async fn test_public_page_serves_local_record() {
    let dir = TempDir::new().unwrap();
    let user = Uuid::new_v4();

    let saved = degraded_app(&dir)
        .oneshot(
            Request::post("/api/v1/invitations")
                .header(header::AUTHORIZATION, bearer(user))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(create_invitation_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let saved = body_json(saved).await;
    let slug = saved["data"]["slug"].as_str().unwrap().to_string();

    let response = degraded_app(&dir)
        .oneshot(
            Request::get(format!("/api/v1/i/{slug}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["bride_name"], "Asal");
    assert_eq!(body["slug"], slug);
    // Owner identity never appears on the public page
    assert!(body.get("owner_id").is_none());
}

#[tokio::test]
async fn test_owner_isolation_in_fallback() {
    let dir = TempDir::new().unwrap();
    let asal = Uuid::new_v4();
    let nigora = Uuid::new_v4();

    degraded_app(&dir)
        .oneshot(
            Request::post("/api/v1/invitations")
                .header(header::AUTHORIZATION, bearer(asal))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(create_invitation_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let response = degraded_app(&dir)
        .oneshot(
            Request::get("/api/v1/invitations")
                .header(header::AUTHORIZATION, bearer(nigora))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_health_reports_local_fallback_mode() {
    let dir = TempDir::new().unwrap();

    let response = degraded_app(&dir)
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["storage_mode"], "local_fallback");
    assert_eq!(body["remote_store"]["provisioned"], false);
}

#[tokio::test]
async fn test_unauthenticated_list_is_rejected() {
    let dir = TempDir::new().unwrap();

    let response = degraded_app(&dir)
        .oneshot(
            Request::get("/api/v1/invitations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rsvp_unavailable_without_remote_store() {
    let dir = TempDir::new().unwrap();

    let response = degraded_app(&dir)
        .oneshot(
            Request::post("/api/v1/i/asal-jahon/rsvp")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"name": "Jasur aka", "attending": true}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"], "not_provisioned");
}

#[tokio::test]
async fn test_admin_routes_unavailable_without_remote_store() {
    let dir = TempDir::new().unwrap();

    let response = degraded_app(&dir)
        .oneshot(
            Request::get("/api/v1/admin/purchase-requests")
                .header(header::AUTHORIZATION, bearer(Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"], "not_provisioned");
}

#[tokio::test]
async fn test_draft_survives_local_only_save() {
    let dir = TempDir::new().unwrap();
    let app = degraded_app(&dir);
    let user = Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(
            Request::put("/api/v1/drafts/invitation")
                .header(header::AUTHORIZATION, bearer(user))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"bride_name": "Asal"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // A save that only reached the fallback store must not clear the draft;
    // drafts are cleared on remote success alone.
    app.clone()
        .oneshot(
            Request::post("/api/v1/invitations")
                .header(header::AUTHORIZATION, bearer(user))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(create_invitation_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::get("/api/v1/drafts/invitation")
                .header(header::AUTHORIZATION, bearer(user))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["bride_name"], "Asal");
}

#[tokio::test]
async fn test_unknown_draft_kind_is_rejected() {
    let dir = TempDir::new().unwrap();

    let response = degraded_app(&dir)
        .oneshot(
            Request::get("/api/v1/drafts/geofence")
                .header(header::AUTHORIZATION, bearer(Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
