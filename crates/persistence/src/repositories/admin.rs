//! Administrative repositories: purchase requests, subscriptions, and the
//! admin allowlist.
//!
//! Admin listings use cursor pagination keyed on (created_at, id) so pages
//! stay stable while new rows arrive.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::admin::{
    CreatePurchaseRequest, PurchaseRequest, PurchaseStatus, Subscription, SubscriptionStatus,
};

use crate::entities::{PurchaseRequestEntity, SubscriptionEntity};
use crate::error::RemoteError;
use crate::metrics::QueryTimer;
use crate::reconcile::RemoteStatus;

const PURCHASE_COLUMNS: &str =
    "id, user_id, plan, contact_phone, note, status, handled_by, handled_at, created_at";

const SUBSCRIPTION_COLUMNS: &str =
    "id, user_id, plan, status, started_at, expires_at, updated_by, updated_at";

/// Repository over the admin allowlist table.
#[derive(Clone)]
pub struct AdminUserRepository {
    pool: PgPool,
}

impl AdminUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn is_admin(&self, user_id: Uuid) -> Result<bool, RemoteError> {
        let timer = QueryTimer::new("check_is_admin");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM admin_users WHERE user_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?)
    }
}

/// Repository for purchase requests.
#[derive(Clone)]
pub struct PurchaseRequestRepository {
    pool: PgPool,
}

impl PurchaseRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a purchase request on behalf of a user.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: &CreatePurchaseRequest,
    ) -> Result<PurchaseRequest, RemoteError> {
        let timer = QueryTimer::new("create_purchase_request");
        let result = sqlx::query_as::<_, PurchaseRequestEntity>(&format!(
            r#"
            INSERT INTO purchase_requests (user_id, plan, contact_phone, note)
            VALUES ($1, $2, $3, $4)
            RETURNING {PURCHASE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&request.plan)
        .bind(&request.contact_phone)
        .bind(&request.note)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(PurchaseRequest::from(result?))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PurchaseRequest>, RemoteError> {
        let timer = QueryTimer::new("find_purchase_request");
        let result = sqlx::query_as::<_, PurchaseRequestEntity>(&format!(
            r#"
            SELECT {PURCHASE_COLUMNS}
            FROM purchase_requests
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(PurchaseRequest::from))
    }

    /// The caller's own requests, newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PurchaseRequest>, RemoteError> {
        let timer = QueryTimer::new("list_purchase_requests_for_user");
        let result = sqlx::query_as::<_, PurchaseRequestEntity>(&format!(
            r#"
            SELECT {PURCHASE_COLUMNS}
            FROM purchase_requests
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(PurchaseRequest::from).collect())
    }

    /// Admin listing, optionally filtered by status, cursor-paginated.
    /// Fetches `limit` rows after the cursor position (newest first).
    pub async fn list(
        &self,
        status: Option<PurchaseStatus>,
        cursor: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> Result<Vec<PurchaseRequest>, RemoteError> {
        let timer = QueryTimer::new("list_purchase_requests");
        let (cursor_at, cursor_id) = match cursor {
            Some((at, id)) => (Some(at), Some(id)),
            None => (None, None),
        };
        let result = sqlx::query_as::<_, PurchaseRequestEntity>(&format!(
            r#"
            SELECT {PURCHASE_COLUMNS}
            FROM purchase_requests
            WHERE ($1::purchase_status IS NULL OR status = $1)
              AND ($2::timestamptz IS NULL OR (created_at, id) < ($2, $3))
            ORDER BY created_at DESC, id DESC
            LIMIT $4
            "#
        ))
        .bind(status)
        .bind(cursor_at)
        .bind(cursor_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(PurchaseRequest::from).collect())
    }
}

#[async_trait]
impl RemoteStatus<PurchaseStatus> for PurchaseRequestRepository {
    type Record = PurchaseRequest;

    /// Apply a status transition, recording the acting admin and when.
    /// Transition legality is checked by the caller against the current row.
    async fn apply_status(
        &self,
        id: Uuid,
        status: PurchaseStatus,
        actor_id: Uuid,
    ) -> Result<PurchaseRequest, RemoteError> {
        let timer = QueryTimer::new("update_purchase_request_status");
        let result = sqlx::query_as::<_, PurchaseRequestEntity>(&format!(
            r#"
            UPDATE purchase_requests
            SET status = $2, handled_by = $3, handled_at = now()
            WHERE id = $1
            RETURNING {PURCHASE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(actor_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result?.map(PurchaseRequest::from).ok_or(RemoteError::MissingReference)
    }
}

/// Repository for user subscriptions.
#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grant a subscription, typically after a purchase request completes.
    pub async fn create(
        &self,
        user_id: Uuid,
        plan: &str,
        expires_at: Option<DateTime<Utc>>,
        granted_by: Uuid,
    ) -> Result<Subscription, RemoteError> {
        let timer = QueryTimer::new("create_subscription");
        let result = sqlx::query_as::<_, SubscriptionEntity>(&format!(
            r#"
            INSERT INTO user_subscriptions (user_id, plan, expires_at, updated_by)
            VALUES ($1, $2, $3, $4)
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(plan)
        .bind(expires_at)
        .bind(granted_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(Subscription::from(result?))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Subscription>, RemoteError> {
        let timer = QueryTimer::new("find_subscription");
        let result = sqlx::query_as::<_, SubscriptionEntity>(&format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM user_subscriptions
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Subscription::from))
    }

    /// The caller's own subscriptions, newest grant first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Subscription>, RemoteError> {
        let timer = QueryTimer::new("list_subscriptions_for_user");
        let result = sqlx::query_as::<_, SubscriptionEntity>(&format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM user_subscriptions
            WHERE user_id = $1
            ORDER BY started_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(Subscription::from).collect())
    }

    /// Admin listing, optionally filtered by status, cursor-paginated on
    /// (started_at, id).
    pub async fn list(
        &self,
        status: Option<SubscriptionStatus>,
        cursor: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> Result<Vec<Subscription>, RemoteError> {
        let timer = QueryTimer::new("list_subscriptions");
        let (cursor_at, cursor_id) = match cursor {
            Some((at, id)) => (Some(at), Some(id)),
            None => (None, None),
        };
        let result = sqlx::query_as::<_, SubscriptionEntity>(&format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM user_subscriptions
            WHERE ($1::subscription_status IS NULL OR status = $1)
              AND ($2::timestamptz IS NULL OR (started_at, id) < ($2, $3))
            ORDER BY started_at DESC, id DESC
            LIMIT $4
            "#
        ))
        .bind(status)
        .bind(cursor_at)
        .bind(cursor_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(Subscription::from).collect())
    }
}

#[async_trait]
impl RemoteStatus<SubscriptionStatus> for SubscriptionRepository {
    type Record = Subscription;

    async fn apply_status(
        &self,
        id: Uuid,
        status: SubscriptionStatus,
        actor_id: Uuid,
    ) -> Result<Subscription, RemoteError> {
        let timer = QueryTimer::new("update_subscription_status");
        let result = sqlx::query_as::<_, SubscriptionEntity>(&format!(
            r#"
            UPDATE user_subscriptions
            SET status = $2, updated_by = $3, updated_at = now()
            WHERE id = $1
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(actor_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result?.map(Subscription::from).ok_or(RemoteError::MissingReference)
    }
}
