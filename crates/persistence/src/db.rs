//! Remote store connection management.
//!
//! An empty endpoint URL is not a startup failure: it is the structured
//! "never provisioned" condition, and the service boots into degraded mode
//! serving the local fallback store only.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::error::RemoteError;

/// Remote store configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Endpoint URL; empty means the remote store was never provisioned.
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    /// True when a remote endpoint has been supplied at all.
    pub fn is_provisioned(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Creates a PostgreSQL connection pool for the remote store.
///
/// Returns `RemoteError::NotProvisioned` when no endpoint is configured and
/// `RemoteError::Unavailable` when the endpoint does not answer; callers are
/// expected to continue in degraded mode on either.
pub async fn connect_remote(config: &DatabaseConfig) -> Result<PgPool, RemoteError> {
    if !config.is_provisioned() {
        return Err(RemoteError::NotProvisioned(
            "no remote store endpoint configured".to_string(),
        ));
    }

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(RemoteError::from)
}

/// Applies pending schema migrations to the remote store.
pub async fn run_migrations(pool: &PgPool) -> Result<(), RemoteError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|err| RemoteError::NotProvisioned(format!("migration failed: {err}")))
}
