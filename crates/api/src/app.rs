use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use persistence::cache::DraftCache;
use persistence::fallback::{FallbackError, FallbackStore};
use persistence::reconcile::Reconciler;
use persistence::repositories::{
    AdminUserRepository, GuestRepository, InvitationRepository, ProfileRepository,
    PurchaseRequestRepository, SubscriptionRepository, TemplateRepository,
};
use shared::jwt::JwtConfig;

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_admin, trace_id};
use crate::routes::{admin, billing, drafts, guests, health, invitations, profiles, public, templates};

#[derive(Clone)]
pub struct AppState {
    /// Remote store pool; `None` when the service runs in degraded mode.
    pub pool: Option<PgPool>,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub reconciler: Arc<Reconciler>,
    pub drafts: Arc<DraftCache>,
}

impl AppState {
    pub fn invitations(&self) -> Option<InvitationRepository> {
        self.pool.clone().map(InvitationRepository::new)
    }

    pub fn templates(&self) -> Option<TemplateRepository> {
        self.pool.clone().map(TemplateRepository::new)
    }

    pub fn guests(&self) -> Option<GuestRepository> {
        self.pool.clone().map(GuestRepository::new)
    }

    pub fn profiles(&self) -> Option<ProfileRepository> {
        self.pool.clone().map(ProfileRepository::new)
    }

    pub fn admin_users(&self) -> Option<AdminUserRepository> {
        self.pool.clone().map(AdminUserRepository::new)
    }

    pub fn purchase_requests(&self) -> Option<PurchaseRequestRepository> {
        self.pool.clone().map(PurchaseRequestRepository::new)
    }

    pub fn subscriptions(&self) -> Option<SubscriptionRepository> {
        self.pool.clone().map(SubscriptionRepository::new)
    }
}

pub fn create_app(config: Config, pool: Option<PgPool>) -> Result<Router, FallbackError> {
    let fallback = FallbackStore::open(&config.fallback.dir)?;
    let drafts = Arc::new(DraftCache::new());
    let reconciler = Arc::new(Reconciler::new(
        fallback,
        drafts.clone(),
        Duration::from_secs(config.database.remote_timeout_secs),
    ));
    let jwt = Arc::new(JwtConfig::from_secret(
        &config.auth.session_secret,
        config.auth.leeway_secs,
    ));
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        reconciler,
        drafts,
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes: health, metrics, the invitation page and its RSVP form,
    // and the template gallery.
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/i/:slug", get(public::view_invitation))
        .route("/api/v1/i/:slug/rsvp", post(public::submit_rsvp))
        .route(
            "/api/v1/templates/public",
            get(templates::list_public_templates),
        );

    // Authenticated routes; each handler extracts and verifies the session
    // token itself.
    let user_routes = Router::new()
        .route(
            "/api/v1/profile",
            get(profiles::get_profile).put(profiles::update_profile),
        )
        .route(
            "/api/v1/invitations",
            get(invitations::list_invitations).post(invitations::create_invitation),
        )
        .route(
            "/api/v1/invitations/:id",
            put(invitations::update_invitation).delete(invitations::delete_invitation),
        )
        .route(
            "/api/v1/invitations/:id/guests",
            get(guests::list_guests).post(guests::add_guest),
        )
        .route(
            "/api/v1/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/api/v1/templates/:id",
            put(templates::update_template).delete(templates::delete_template),
        )
        .route(
            "/api/v1/drafts/:kind",
            get(drafts::get_draft)
                .put(drafts::put_draft)
                .delete(drafts::delete_draft),
        )
        .route(
            "/api/v1/purchase-requests",
            get(billing::list_own_purchase_requests).post(billing::create_purchase_request),
        )
        .route(
            "/api/v1/subscriptions",
            get(billing::list_own_subscriptions),
        );

    // Admin routes sit behind the allowlist check.
    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/purchase-requests",
            get(admin::list_purchase_requests),
        )
        .route(
            "/api/v1/admin/purchase-requests/:id/status",
            put(admin::update_purchase_status),
        )
        .route(
            "/api/v1/admin/subscriptions",
            get(admin::list_subscriptions).post(admin::create_subscription),
        )
        .route(
            "/api/v1/admin/subscriptions/:id/status",
            put(admin::update_subscription_status),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Ok(Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .with_state(state))
}
