//! Structured remote-store error taxonomy.
//!
//! The reconciliation layer never inspects error message text. Every sqlx
//! error is classified here, once, into a kind the rest of the system can
//! match on: a missing relation means the backend was never provisioned and
//! warrants a persistent setup prompt; a connectivity failure is transient
//! and recovered through the local fallback store; a permission failure is
//! blocking and never recovered locally.

use thiserror::Error;

/// PostgreSQL error code: relation (table) does not exist.
const PG_UNDEFINED_TABLE: &str = "42P01";
/// PostgreSQL error code: insufficient privilege (row-level policy denial).
const PG_INSUFFICIENT_PRIVILEGE: &str = "42501";
/// PostgreSQL error code: unique constraint violation.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL error code: foreign key violation.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Classified remote store failure.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The remote store was never provisioned: no endpoint configured, or
    /// the schema (relation) is missing. Surfaced as a persistent setup
    /// prompt, not a transient advisory.
    #[error("Remote store is not provisioned: {0}")]
    NotProvisioned(String),

    /// Transient connectivity failure (unreachable host, pool exhaustion,
    /// dropped connection). Recovered through the local fallback store.
    #[error("Remote store unavailable: {0}")]
    Unavailable(String),

    /// The bounded wait elapsed before the remote store responded.
    #[error("Remote store did not respond within {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The remote store refused the operation for this identity. Blocking;
    /// never recovered locally.
    #[error("Remote store denied the operation: {0}")]
    Denied(String),

    /// Unique key collision reported by the remote store.
    #[error("Remote store conflict: {0}")]
    Conflict(String),

    /// A referenced row does not exist (or is no longer active).
    #[error("Referenced record not found")]
    MissingReference,

    /// Any other remote failure.
    #[error("Remote store error: {0}")]
    Query(#[source] sqlx::Error),
}

impl RemoteError {
    /// True when the failure should be recovered through the local fallback
    /// store rather than reported to the caller.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, RemoteError::Denied(_))
    }

    /// True when the failure indicates the backend was never provisioned.
    pub fn is_not_provisioned(&self) -> bool {
        matches!(self, RemoteError::NotProvisioned(_))
    }
}

impl From<sqlx::Error> for RemoteError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(PG_UNDEFINED_TABLE) => {
                    RemoteError::NotProvisioned(format!("relation missing: {}", db_err.message()))
                }
                Some(PG_INSUFFICIENT_PRIVILEGE) => {
                    RemoteError::Denied(db_err.message().to_string())
                }
                Some(PG_UNIQUE_VIOLATION) => RemoteError::Conflict(db_err.message().to_string()),
                Some(PG_FOREIGN_KEY_VIOLATION) => RemoteError::MissingReference,
                _ => RemoteError::Query(err),
            },
            sqlx::Error::Io(io_err) => RemoteError::Unavailable(io_err.to_string()),
            sqlx::Error::PoolTimedOut => {
                RemoteError::Unavailable("connection pool timed out".to_string())
            }
            sqlx::Error::PoolClosed => RemoteError::Unavailable("connection pool closed".to_string()),
            sqlx::Error::Tls(tls_err) => RemoteError::Unavailable(tls_err.to_string()),
            _ => RemoteError::Query(err),
        }
    }
}
